use std::iter;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};
use tetron_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid, Placement};

use crate::ui::widgets::{CellDisplay, Tile};

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    grid: &'a Grid,
    ghost: Option<Placement>,
    falling_piece: Option<Placement>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, ghost: Option<Placement>) -> Self {
        Self { ghost, ..self }
    }

    pub fn falling_piece(self, falling_piece: Option<Placement>) -> Self {
        Self {
            falling_piece,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn width(&self) -> u16 {
        BOARD_WIDTH as u16 * CellDisplay::width()
            + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        BOARD_HEIGHT as u16 * CellDisplay::height()
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Locked cells with the ghost and the falling piece drawn on top.
    fn tiles(&self) -> [[Tile; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut tiles = [[Tile::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (tile_row, row) in iter::zip(&mut tiles, self.grid.rows()) {
            for (tile, cell) in iter::zip(tile_row, row) {
                *tile = Tile::from(*cell);
            }
        }

        let mut paint = |placement: &Placement, tile: Tile| {
            for (x, y) in placement.cells() {
                let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                    continue;
                };
                if let Some(slot) = tiles.get_mut(y).and_then(|row| row.get_mut(x))
                    && (*slot == Tile::Empty || !matches!(tile, Tile::Ghost))
                {
                    *slot = tile;
                }
            }
        };
        if let Some(ghost) = &self.ghost {
            paint(ghost, Tile::Ghost);
        }
        if let Some(piece) = &self.falling_piece {
            paint(piece, Tile::Filled(piece.piece().color()));
        }
        tiles
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(CellDisplay::width()));
        let row_constraints = (0..BOARD_HEIGHT).map(|_| Constraint::Length(CellDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<BOARD_HEIGHT>(&vertical)
            .into_iter()
            .map(|row| row.layout::<BOARD_WIDTH>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.tiles()) {
            for (grid_cell, tile) in iter::zip(grid_row, row) {
                CellDisplay::from_tile(tile, true).render(grid_cell, buf);
            }
        }
    }
}
