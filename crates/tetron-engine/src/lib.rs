//! Rules engine for a single-player falling-block puzzle game.
//!
//! The crate is split into two layers:
//!
//! - [`core`] - board geometry: tetromino shapes, rotation, the grid and
//!   placement legality
//! - [`engine`] - game rules: spawning, scoring, the session state machine and
//!   gravity timing
//!
//! It performs no I/O and keeps no global state; presentation layers observe a
//! [`Session`] through its getters or a [`SessionSnapshot`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reason a [`Session`] command was not accepted.
///
/// A rejected command leaves the session unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    /// The resulting placement would leave the board or overlap locked cells.
    #[display("placement collides with the board")]
    InvalidPlacement,
    /// The command has no meaning in the current phase.
    #[display("command not allowed while {phase}")]
    IllegalCommandForPhase { phase: Phase },
}
