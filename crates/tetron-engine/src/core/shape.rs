/// Largest side of any tetromino bounding box.
pub const MAX_SHAPE_SIZE: usize = 4;

/// Rotation-state footprint of a piece: a small boolean matrix.
///
/// Shapes are immutable values. Rotating produces a new `Shape` whose width and
/// height are swapped; cells outside `width × height` are always unoccupied, so
/// two shapes with the same footprint compare equal.
///
/// # Example
///
/// ```
/// use tetron_engine::{PieceKind, Shape};
///
/// let t = PieceKind::T.base_shape();
/// let rotated = t.rotated_cw();
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(t.rotated_cw().rotated_cw().rotated_cw().rotated_cw(), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from 0/1 rows, top row first.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero or larger than [`MAX_SHAPE_SIZE`].
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Self {
        assert!(W > 0 && W <= MAX_SHAPE_SIZE);
        assert!(H > 0 && H <= MAX_SHAPE_SIZE);
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut y = 0;
        while y < H {
            let mut x = 0;
            while x < W {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: W as u8,
            height: H as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether `(x, y)` (column, row) is an occupied cell.
    ///
    /// Coordinates outside the bounding box are unoccupied.
    #[must_use]
    pub const fn is_occupied(&self, x: usize, y: usize) -> bool {
        x < self.width() && y < self.height() && self.cells[y][x]
    }

    /// Returns the `(x, y)` offsets of occupied cells, row by row.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |y| {
            (0..self.width()).filter_map(move |x| self.cells[y][x].then_some((x, y)))
        })
    }

    /// Returns the rows of the bounding box, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.cells[..self.height()]
            .iter()
            .map(|row| &row[..self.width()])
    }

    /// Rotates the shape 90° clockwise.
    ///
    /// The result has `height` columns and `width` rows, with
    /// `rotated[c][height - 1 - r] = self[r][c]`. The grid is not consulted.
    #[must_use]
    pub const fn rotated_cw(&self) -> Self {
        let rows = self.height();
        let cols = self.width();
        let mut cells = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        let mut r = 0;
        while r < rows {
            let mut c = 0;
            while c < cols {
                cells[c][rows - 1 - r] = self.cells[r][c];
                c += 1;
            }
            r += 1;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    fn render(shape: &Shape) -> Vec<String> {
        shape
            .rows()
            .map(|row| row.iter().map(|&c| if c { '#' } else { '.' }).collect())
            .collect()
    }

    #[test]
    fn test_rotate_i_piece() {
        let i = PieceKind::I.base_shape();
        let rotated = i.rotated_cw();
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 4);
        assert_eq!(render(&rotated), ["#", "#", "#", "#"]);
    }

    #[test]
    fn test_rotate_t_piece() {
        let t = PieceKind::T.base_shape();
        assert_eq!(render(&t), [".#.", "###"]);
        assert_eq!(render(&t.rotated_cw()), ["#.", "##", "#."]);
        assert_eq!(render(&t.rotated_cw().rotated_cw()), ["###", ".#."]);
        assert_eq!(render(&t.rotated_cw().rotated_cw().rotated_cw()), [".#", "##", ".#"]);
    }

    #[test]
    fn test_rotate_l_piece() {
        let l = PieceKind::L.base_shape();
        assert_eq!(render(&l.rotated_cw()), ["#.", "#.", "##"]);
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let o = PieceKind::O.base_shape();
        assert_eq!(o.rotated_cw(), o);
    }

    #[test]
    fn test_four_rotations_return_original() {
        for kind in PieceKind::ALL {
            let shape = kind.base_shape();
            let mut rotated = shape;
            for _ in 0..4 {
                rotated = rotated.rotated_cw();
            }
            assert_eq!(rotated, shape, "{kind:?}");
        }
    }

    #[test]
    fn test_rotation_preserves_cell_count() {
        for kind in PieceKind::ALL {
            let shape = kind.base_shape();
            assert_eq!(shape.rotated_cw().occupied_cells().count(), 4);
        }
    }

    #[test]
    fn test_is_occupied_outside_bounds() {
        let s = PieceKind::S.base_shape();
        assert!(s.is_occupied(1, 0));
        assert!(!s.is_occupied(0, 0));
        assert!(!s.is_occupied(3, 0));
        assert!(!s.is_occupied(0, 2));
    }
}
