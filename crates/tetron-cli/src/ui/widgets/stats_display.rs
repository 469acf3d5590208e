use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};
use tetron_engine::Session;

use crate::ui::widgets::style;

/// Values shown in the stats panel.
#[derive(Debug, Clone, Copy)]
struct StatsValues {
    score: usize,
    high_score: usize,
    level: usize,
    lines: usize,
    fall_interval_ms: u128,
    pieces: usize,
    line_clears: [usize; 5],
}

pub struct StatsDisplay<'a> {
    values: StatsValues,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(session: &Session, high_score: usize) -> Self {
        let stats = session.stats();
        Self {
            values: StatsValues {
                score: stats.score(),
                high_score: high_score.max(stats.score()),
                level: stats.level(),
                lines: stats.total_cleared_lines(),
                fall_interval_ms: session.fall_interval().as_millis(),
                pieces: stats.completed_pieces(),
                line_clears: *stats.line_cleared_counter(),
            },
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&StatsValues) -> String),
    LabelValue(&'static str, &'static dyn Fn(&StatsValues) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|values| values.score.to_string()),
    Row::FullLabel("HIGH SCORE:"),
    Row::FullValue(&|values| values.high_score.to_string()),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|values| values.level.to_string()),
    Row::LabelValue("LINES:", &|values| values.lines.to_string()),
    Row::LabelValue("SPEED:", &|values| format!("{}ms", values.fall_interval_ms)),
    Row::Empty,
    Row::LabelValue("PIECES:", &|values| values.pieces.to_string()),
    Row::LabelValue("SINGLES:", &|values| values.line_clears[1].to_string()),
    Row::LabelValue("DOUBLES:", &|values| values.line_clears[2].to_string()),
    Row::LabelValue("TRIPLES:", &|values| values.line_clears[3].to_string()),
    Row::LabelValue("TETRIS:", &|values| values.line_clears[4].to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self.values), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self.values), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
