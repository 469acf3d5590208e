//! Game rules layered on top of [`crate::core`].
//!
//! - [`Session`] - one game: grid, falling piece, lookahead, phase, scoring
//! - [`PieceSpawner`] - random piece source with a one-piece lookahead
//! - [`GameStats`] - score, cleared lines and level progression
//! - [`GravityTimer`] - phase-aware countdown for driving [`Session::tick`]
//!
//! # Game Flow
//!
//! 1. A new [`Session`] starts in [`Phase::Spawning`]
//! 2. The first [`Session::tick`] brings the queued piece onto the board
//! 3. The player moves and rotates the piece while gravity ticks pull it down
//! 4. A blocked gravity tick or a hard drop locks the piece, clears full lines,
//!    scores, and spawns the next piece
//! 5. When a spawned piece collides the session enters [`Phase::GameOver`]
//!
//! # Example
//!
//! ```
//! use tetron_engine::{PieceSeed, PieceSpawner, Randomizer, Session};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let spawner = PieceSpawner::with_seed(seed).randomizer(Randomizer::SevenBag);
//! let mut session = Session::with_spawner(spawner);
//!
//! while !session.phase().is_game_over() {
//!     if session.phase().is_spawning() {
//!         session.tick().unwrap();
//!     } else {
//!         session.hard_drop().unwrap();
//!     }
//! }
//! assert!(session.stats().completed_pieces() > 0);
//! ```

pub use self::{gravity::*, scoring::*, session::*, spawner::*};

mod gravity;
mod scoring;
mod session;
mod spawner;
