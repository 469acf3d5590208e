use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};
use tetron_engine::{Cell, Color};

use crate::ui::widgets::{color, style};

/// What a single board square shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    /// Landing preview of the falling piece.
    Ghost,
    Filled(Color),
}

impl From<Cell> for Tile {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => Tile::Empty,
            Cell::Filled(color) => Tile::Filled(color),
        }
    }
}

#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_tile(tile: Tile, show_dots: bool) -> Self {
        match tile {
            Tile::Empty if show_dots => Self::new(style::EMPTY_DOT, " ."),
            Tile::Empty => Self::new(style::EMPTY, ""),
            Tile::Ghost => Self::new(style::GHOST, "[]"),
            Tile::Filled(piece_color) => {
                Self::new(style::bg_only(color::from_piece(piece_color)), "")
            }
        }
    }
}

impl Widget for CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &CellDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}
