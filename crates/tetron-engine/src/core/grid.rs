use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{
    placement::{self, Placement},
    tetromino::Color,
};

/// Number of columns of the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows of the board.
pub const BOARD_HEIGHT: usize = 20;

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// Occupied by a locked piece of the given color.
    Filled(Color),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }
}

/// One row of the grid, left to right.
pub type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

fn is_row_full(row: &Row) -> bool {
    row.iter().all(|cell| !cell.is_empty())
}

/// The `BOARD_WIDTH × BOARD_HEIGHT` matrix of locked cells.
///
/// Row 0 is the top of the board. The dimensions are fixed by the type, so a
/// grid can never change size over a session.
///
/// # Example
///
/// ```
/// use tetron_engine::{BOARD_WIDTH, Cell, Grid, PieceKind};
///
/// let mut grid = Grid::EMPTY;
/// for x in 0..BOARD_WIDTH {
///     grid.set_cell(x, 19, Cell::Filled(PieceKind::I.color()));
/// }
/// assert_eq!(grid.clear_full_lines(), 1);
/// assert_eq!(grid, Grid::EMPTY);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const WIDTH: usize = BOARD_WIDTH;
    pub const HEIGHT: usize = BOARD_HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; BOARD_HEIGHT],
    };

    /// Returns the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the board.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Overwrites the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the board.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        self.rows[y][x] = cell;
    }

    /// Returns whether `placement` may exist on this grid.
    ///
    /// See [`placement::is_valid`] for the exact rule.
    #[must_use]
    pub fn is_valid(&self, placement: &Placement) -> bool {
        let origin = placement.origin();
        placement::is_valid(self, placement.shape(), origin.x, origin.y)
    }

    /// Writes the piece's color into every covered cell.
    ///
    /// Cells above the board (`y < 0`) are dropped. The placement is expected
    /// to be valid; cells outside the horizontal bounds are ignored.
    #[expect(clippy::cast_sign_loss)]
    pub fn lock(&mut self, placement: &Placement) {
        let color = placement.piece().color();
        for (x, y) in placement.cells() {
            if y < 0 || x < 0 {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if x < BOARD_WIDTH && y < BOARD_HEIGHT {
                self.rows[y][x] = Cell::Filled(color);
            }
        }
    }

    /// Returns the indices of full rows, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> ArrayVec<usize, BOARD_HEIGHT> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| is_row_full(row))
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes every full row at once and returns how many were removed.
    ///
    /// Remaining rows keep their order and settle at the bottom; the vacated
    /// rows at the top become empty.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..BOARD_HEIGHT).rev() {
            if is_row_full(&self.rows[y]) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn filled_cells(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Origin, Piece, PieceKind};

    const RED: Cell = Cell::Filled(Color::rgb(0xf0, 0, 0));
    const BLUE: Cell = Cell::Filled(Color::rgb(0, 0, 0xf0));

    fn fill_row(grid: &mut Grid, y: usize, cell: Cell) {
        for x in 0..BOARD_WIDTH {
            grid.set_cell(x, y, cell);
        }
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.rows().count(), BOARD_HEIGHT);
        assert!(grid.rows().all(|row| row.len() == BOARD_WIDTH));
        assert_eq!(grid.filled_cells(), 0);
        assert!(grid.full_rows().is_empty());
    }

    #[test]
    fn test_lock_writes_color() {
        let mut grid = Grid::EMPTY;
        let placement = Placement::new(Piece::new(PieceKind::T), Origin::new(4, 18));
        grid.lock(&placement);

        let color = PieceKind::T.color();
        assert_eq!(grid.cell(5, 18), Cell::Filled(color));
        assert_eq!(grid.cell(4, 19), Cell::Filled(color));
        assert_eq!(grid.cell(5, 19), Cell::Filled(color));
        assert_eq!(grid.cell(6, 19), Cell::Filled(color));
        assert_eq!(grid.cell(4, 18), Cell::Empty);
        assert_eq!(grid.filled_cells(), 4);
    }

    #[test]
    fn test_lock_drops_cells_above_board() {
        let mut grid = Grid::EMPTY;
        let placement = Placement::new(
            Piece::new(PieceKind::I).rotated_cw(),
            Origin::new(0, -2),
        );
        grid.lock(&placement);
        assert_eq!(grid.filled_cells(), 2);
        assert!(!grid.cell(0, 0).is_empty());
        assert!(!grid.cell(0, 1).is_empty());
    }

    #[test]
    fn test_clear_lines_basic() {
        let mut grid = Grid::EMPTY;
        fill_row(&mut grid, 0, RED);
        assert_eq!(grid.full_rows().as_slice(), &[0]);
        assert_eq!(grid.clear_full_lines(), 1);
        assert_eq!(grid, Grid::EMPTY);
    }

    #[test]
    fn test_clear_lines_with_partial_lines() {
        let mut grid = Grid::EMPTY;
        for x in 0..BOARD_WIDTH - 1 {
            grid.set_cell(x, 19, RED);
        }
        let before = grid.clone();
        assert_eq!(grid.clear_full_lines(), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_clear_lines_compacts_non_adjacent_rows() {
        let mut grid = Grid::EMPTY;
        // rows 19, 17, 15 full; 18 and 16 partial
        fill_row(&mut grid, 19, RED);
        grid.set_cell(0, 18, BLUE);
        fill_row(&mut grid, 17, RED);
        grid.set_cell(1, 16, BLUE);
        fill_row(&mut grid, 15, RED);
        grid.set_cell(2, 14, BLUE);

        assert_eq!(grid.full_rows().as_slice(), &[15, 17, 19]);
        assert_eq!(grid.clear_full_lines(), 3);

        let mut expected = Grid::EMPTY;
        expected.set_cell(0, 19, BLUE);
        expected.set_cell(1, 18, BLUE);
        expected.set_cell(2, 17, BLUE);
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_clear_lines_all_filled() {
        let mut grid = Grid::EMPTY;
        for y in 0..BOARD_HEIGHT {
            fill_row(&mut grid, y, RED);
        }
        assert_eq!(grid.clear_full_lines(), BOARD_HEIGHT);
        assert_eq!(grid, Grid::EMPTY);
    }

    #[test]
    fn test_grid_serialization() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(3, 19, RED);
        let json = serde_json::to_string(&grid).unwrap();
        let restored: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);
    }
}
