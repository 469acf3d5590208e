use serde::{Deserialize, Serialize};

use super::{
    grid::{BOARD_HEIGHT, BOARD_WIDTH, Grid},
    shape::Shape,
    tetromino::{Color, PieceKind},
};

/// A piece instance: its kind and current rotation-state footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
}

impl Piece {
    /// Creates a piece in its spawn orientation.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.base_shape(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[must_use]
    pub const fn color(&self) -> Color {
        self.kind.color()
    }

    /// Returns the same piece with its shape rotated 90° clockwise.
    #[must_use]
    pub const fn rotated_cw(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated_cw(),
        }
    }
}

/// Position of a piece's bounding-box top-left corner in grid coordinates.
///
/// `x` grows rightward, `y` grows downward, `(0, 0)` is the top-left cell of
/// the visible board. Either coordinate may be negative: cells above row 0
/// are exempt from occupancy checks (see [`is_valid`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub x: i32,
    pub y: i32,
}

impl Origin {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A piece at a position on the grid.
///
/// Placements are values: moving or rotating returns a new `Placement`, and the
/// caller decides whether to keep it by asking [`Grid::is_valid`].
///
/// # Example
///
/// ```
/// use tetron_engine::{Grid, Origin, Piece, PieceKind, Placement};
///
/// let grid = Grid::EMPTY;
/// let placement = Placement::new(Piece::new(PieceKind::I), Origin::new(3, 0));
/// assert!(grid.is_valid(&placement));
/// assert_eq!(placement.drop_position(&grid).origin().y, 19);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    piece: Piece,
    origin: Origin,
}

impl Placement {
    #[must_use]
    pub const fn new(piece: Piece, origin: Origin) -> Self {
        Self { piece, origin }
    }

    #[must_use]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub const fn origin(&self) -> Origin {
        self.origin
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.piece.kind()
    }

    #[must_use]
    pub const fn shape(&self) -> &Shape {
        self.piece.shape()
    }

    /// Returns the grid coordinates `(x, y)` of every occupied cell.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.piece
            .shape()
            .occupied_cells()
            .map(move |(dx, dy)| (self.origin.x + dx as i32, self.origin.y + dy as i32))
    }

    /// Returns this placement translated by `(dx, dy)`.
    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            piece: self.piece,
            origin: self.origin.offset(dx, dy),
        }
    }

    /// Returns this placement rotated clockwise around the same origin.
    ///
    /// No kick offsets are tried; an illegal result is left for the caller to reject.
    #[must_use]
    pub const fn rotated_cw(&self) -> Self {
        Self {
            piece: self.piece.rotated_cw(),
            origin: self.origin,
        }
    }

    /// Returns the lowest legal placement reachable by moving straight down.
    ///
    /// If `self` is already illegal it is returned unchanged.
    #[must_use]
    pub fn drop_position(&self, grid: &Grid) -> Self {
        let mut dropped = *self;
        while grid.is_valid(&dropped.shifted(0, 1)) {
            dropped = dropped.shifted(0, 1);
        }
        dropped
    }
}

/// Decides whether `shape` may sit at `(origin_x, origin_y)` on `grid`.
///
/// For every occupied cell at grid position `(x, y)`:
///
/// - `x < 0`, `x >= BOARD_WIDTH` or `y >= BOARD_HEIGHT` is illegal, whatever the row;
/// - when `y >= 0`, the cell must also be empty on the grid;
/// - cells with `y < 0` skip the occupancy check.
///
/// This is the only legality rule; translation, rotation and spawning all go through it.
#[must_use]
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn is_valid(grid: &Grid, shape: &Shape, origin_x: i32, origin_y: i32) -> bool {
    shape.occupied_cells().all(|(dx, dy)| {
        let x = origin_x + dx as i32;
        let y = origin_y + dy as i32;
        if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return false;
        }
        y < 0 || grid.cell(x as usize, y as usize).is_empty()
    })
}
