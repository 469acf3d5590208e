pub use self::{grid::*, placement::*, shape::*, tetromino::*};

pub(crate) mod grid;
pub(crate) mod placement;
pub(crate) mod shape;
pub(crate) mod tetromino;
