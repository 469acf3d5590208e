use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    board_display::*, cell_display::*, key_binding_display::*, piece_display::*,
    session_display::*, stats_display::*,
};

mod board_display;
mod cell_display;
mod key_binding_display;
mod piece_display;
mod session_display;
mod stats_display;

mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Terminal color for a piece color from the catalog.
    pub const fn from_piece(color: tetron_engine::Color) -> Color {
        Color::Rgb(color.r(), color.g(), color.b())
    }
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = bg_only(color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::WHITE, color::BLACK);
    pub const PAUSED_POPUP: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER_POPUP: Style = fg_bg(color::WHITE, color::RED);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
