use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Color,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use tetron_engine::{Phase, Session};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Full game screen: stats, board and next piece, with a pause/game-over overlay.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a Session,
    high_score: usize,
    new_high_score: bool,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a Session, high_score: usize) -> Self {
        Self {
            session,
            high_score,
            new_high_score: false,
        }
    }

    /// Announces a new high score in the game-over overlay.
    pub fn new_high_score(self, new_high_score: bool) -> Self {
        Self {
            new_high_score,
            ..self
        }
    }

    fn border_color(&self) -> Color {
        match self.session.phase() {
            Phase::Spawning | Phase::Falling => color::WHITE,
            Phase::Paused => color::YELLOW,
            Phase::GameOver => color::RED,
        }
    }

    fn popup(&self) -> Option<(Text<'static>, ratatui::style::Style)> {
        match self.session.phase() {
            Phase::Spawning | Phase::Falling => None,
            Phase::Paused => Some((Text::from("PAUSED"), style::PAUSED_POPUP)),
            Phase::GameOver => {
                let mut text = Text::from("GAME OVER");
                if self.new_high_score {
                    text.push_line(Line::from("NEW HIGH SCORE!"));
                }
                Some((text, style::GAME_OVER_POPUP))
            }
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::horizontal(1);
        let border_style = self.border_color();
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = BoardDisplay::new(self.session.grid())
            .falling_piece(self.session.active_placement().copied())
            .ghost(self.session.drop_preview())
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let next_panel = PieceDisplay::new()
            .piece(self.session.next_kind())
            .block(panel("NEXT"));
        let stats_panel = StatsDisplay::new(self.session, self.high_score).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(stats_panel.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(stats_panel.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        stats_panel.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((text, style)) = self.popup() {
            let height = u16::try_from(text.height()).unwrap_or(1);
            let block = Block::new().style(style);
            let text = text.style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(height + 2),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(height)), buf);
        }
    }
}
