use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    BOARD_HEIGHT, CommandError, Grid, Origin, PieceKind, Placement,
    engine::{
        scoring::{GameStats, HARD_DROP_POINTS, SOFT_DROP_POINTS},
        spawner::PieceSpawner,
    },
};

/// Lifecycle phase of a [`Session`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Waiting for the next piece to enter the board.
    #[display("spawning")]
    Spawning,
    /// A piece is falling and accepts moves.
    #[display("falling")]
    Falling,
    /// Gravity and piece commands are frozen.
    #[display("paused")]
    Paused,
    /// A spawned piece collided. Only a new game leaves this phase.
    #[display("game over")]
    GameOver,
}

/// What happened when a piece locked.
///
/// Returned by [`Session::hard_drop`] and [`Session::tick`] so the caller can
/// dispatch side effects (sounds, vibration, high-score persistence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    /// The placement that was merged into the grid.
    pub locked: Placement,
    /// Indices of the rows removed, top to bottom, as they were before compaction.
    pub cleared_rows: ArrayVec<usize, BOARD_HEIGHT>,
    /// Points from the hard drop distance (zero for gravity locks).
    pub drop_points: usize,
    /// Points from the line clear.
    pub clear_points: usize,
    /// Level after the lock, when it changed.
    pub new_level: Option<usize>,
    /// The following piece could not spawn; the session is now over.
    pub topped_out: bool,
}

impl LockReport {
    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.cleared_rows.len()
    }
}

/// Result of a gravity tick.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// A new piece entered the board.
    Spawned(PieceKind),
    /// The new piece collided at its spawn position; the session is over.
    ToppedOut,
    /// The falling piece moved down one row.
    Fell,
    /// The falling piece could not move down and was locked.
    Locked(LockReport),
}

/// The active piece as seen by observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub origin: Origin,
    /// Grid coordinates of the occupied cells.
    pub cells: Vec<(i32, i32)>,
}

impl From<&Placement> for ActiveSnapshot {
    fn from(placement: &Placement) -> Self {
        Self {
            kind: placement.kind(),
            origin: placement.origin(),
            cells: placement.cells().collect(),
        }
    }
}

/// Read-only copy of everything the presentation layer shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub grid: Grid,
    pub active: Option<ActiveSnapshot>,
    pub next: PieceKind,
    pub score: usize,
    pub lines: usize,
    pub level: usize,
    pub fall_interval_ms: u64,
    pub phase: Phase,
}

/// One game: the grid, the falling piece, the lookahead, scoring and phase.
///
/// Every command runs to completion, including any lock, line clear, scoring
/// and spawn it triggers, before it returns. Commands that are not accepted
/// leave the session untouched and report why through [`CommandError`].
///
/// ```text
/// Spawning ──▶ Falling ──(lock)──▶ Spawning
///    │  ▲         │  ▲
///    ▼  │         ▼  │
///   Paused       Paused          Spawning ──(collision)──▶ GameOver
/// ```
///
/// # Example
///
/// ```
/// use tetron_engine::{Phase, Session};
///
/// let mut session = Session::new();
/// assert_eq!(session.phase(), Phase::Spawning);
///
/// session.tick().unwrap(); // spawns the first piece
/// assert_eq!(session.phase(), Phase::Falling);
///
/// _ = session.move_left();
/// _ = session.rotate();
/// let report = session.hard_drop().unwrap();
/// assert!(report.drop_points > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    active: Option<Placement>,
    next_kind: PieceKind,
    spawner: PieceSpawner,
    stats: GameStats,
    phase: Phase,
    resume_phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Starts a session with an OS-seeded uniform spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawner(PieceSpawner::new())
    }

    /// Starts a session drawing pieces from `spawner`.
    #[must_use]
    pub fn with_spawner(mut spawner: PieceSpawner) -> Self {
        let next_kind = spawner.draw();
        Self::from_parts(Grid::EMPTY, next_kind, spawner)
    }

    /// Starts a session on a prepared grid with a chosen first piece.
    ///
    /// The session begins in [`Phase::Spawning`]; `next_kind` is the first
    /// piece to enter the board.
    #[must_use]
    pub fn from_parts(grid: Grid, next_kind: PieceKind, spawner: PieceSpawner) -> Self {
        Self {
            grid,
            active: None,
            next_kind,
            spawner,
            stats: GameStats::new(),
            phase: Phase::Spawning,
            resume_phase: Phase::Spawning,
        }
    }

    /// Replaces the statistics, e.g. to continue a game from a saved state.
    #[must_use]
    pub fn with_stats(self, stats: GameStats) -> Self {
        Self { stats, ..self }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active_placement(&self) -> Option<&Placement> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_kind(&self) -> PieceKind {
        self.next_kind
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.stats.total_cleared_lines()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.stats.level()
    }

    /// Current gravity period. A change applies from the next scheduled tick.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.stats.fall_interval()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Where the active piece would lock if hard-dropped now.
    #[must_use]
    pub fn drop_preview(&self) -> Option<Placement> {
        self.active.map(|placement| placement.drop_position(&self.grid))
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            grid: self.grid.clone(),
            active: self.active.as_ref().map(ActiveSnapshot::from),
            next: self.next_kind,
            score: self.score(),
            lines: self.cleared_lines(),
            level: self.level(),
            fall_interval_ms: crate::fall_interval_ms(self.level()),
            phase: self.phase,
        }
    }

    /// Discards the current game and starts over in [`Phase::Spawning`].
    ///
    /// Accepted in every phase. The spawner keeps its random stream.
    pub fn new_game(&mut self) {
        log::info!(
            "new game (previous: score {}, lines {})",
            self.score(),
            self.cleared_lines()
        );
        self.grid = Grid::EMPTY;
        self.active = None;
        self.next_kind = self.spawner.draw();
        self.stats = GameStats::new();
        self.phase = Phase::Spawning;
        self.resume_phase = Phase::Spawning;
    }

    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.translate(-1, 0)
    }

    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.translate(1, 0)
    }

    /// Moves the piece down one row, awarding soft-drop points.
    ///
    /// A blocked step is rejected; it never locks the piece.
    pub fn soft_drop_step(&mut self) -> Result<(), CommandError> {
        self.translate(0, 1)?;
        self.stats.add_drop_points(1, SOFT_DROP_POINTS);
        Ok(())
    }

    /// Rotates the piece clockwise in place, if the rotated shape fits at
    /// the current origin. No kicks are attempted.
    pub fn rotate(&mut self) -> Result<(), CommandError> {
        let current = self.falling_piece()?;
        self.try_place(current.rotated_cw())
    }

    /// Drops the piece to the lowest legal row and locks it.
    ///
    /// Awards `2 × rows descended`, then the line-clear bonus, and spawns the
    /// next piece, all in one step.
    pub fn hard_drop(&mut self) -> Result<LockReport, CommandError> {
        let current = self.falling_piece()?;
        let dropped = current.drop_position(&self.grid);
        let rows = usize::try_from(dropped.origin().y - current.origin().y).unwrap_or(0);
        let drop_points = self.stats.add_drop_points(rows, HARD_DROP_POINTS);
        Ok(self.lock(dropped, drop_points))
    }

    /// Advances the session by one gravity step.
    ///
    /// - `Spawning`: spawns the queued piece, or ends the game if it collides.
    /// - `Falling`: moves the piece down (awarding soft-drop points), or locks it.
    pub fn tick(&mut self) -> Result<TickOutcome, CommandError> {
        match self.phase {
            Phase::Spawning => Ok(if self.spawn() {
                TickOutcome::Spawned(self.active_kind())
            } else {
                TickOutcome::ToppedOut
            }),
            Phase::Falling => {
                let current = self.falling_piece()?;
                let moved = current.shifted(0, 1);
                if self.grid.is_valid(&moved) {
                    self.active = Some(moved);
                    self.stats.add_drop_points(1, SOFT_DROP_POINTS);
                    Ok(TickOutcome::Fell)
                } else {
                    Ok(TickOutcome::Locked(self.lock(current, 0)))
                }
            }
            phase @ (Phase::Paused | Phase::GameOver) => {
                Err(CommandError::IllegalCommandForPhase { phase })
            }
        }
    }

    /// Freezes the session. Accepted from `Spawning` and `Falling`.
    pub fn pause(&mut self) -> Result<(), CommandError> {
        match self.phase {
            Phase::Spawning | Phase::Falling => {
                self.resume_phase = self.phase;
                self.phase = Phase::Paused;
                Ok(())
            }
            phase @ (Phase::Paused | Phase::GameOver) => {
                Err(CommandError::IllegalCommandForPhase { phase })
            }
        }
    }

    /// Returns to the phase that was interrupted by [`pause`](Self::pause).
    pub fn resume(&mut self) -> Result<(), CommandError> {
        if !self.phase.is_paused() {
            return Err(CommandError::IllegalCommandForPhase { phase: self.phase });
        }
        self.phase = self.resume_phase;
        Ok(())
    }

    /// Pauses or resumes, whichever applies.
    pub fn toggle_pause(&mut self) -> Result<(), CommandError> {
        if self.phase.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    fn falling_piece(&self) -> Result<Placement, CommandError> {
        match (self.phase, self.active) {
            (Phase::Falling, Some(placement)) => Ok(placement),
            (phase, _) => Err(CommandError::IllegalCommandForPhase { phase }),
        }
    }

    fn active_kind(&self) -> PieceKind {
        self.active.map_or(self.next_kind, |placement| placement.kind())
    }

    fn translate(&mut self, dx: i32, dy: i32) -> Result<(), CommandError> {
        let current = self.falling_piece()?;
        self.try_place(current.shifted(dx, dy))
    }

    fn try_place(&mut self, placement: Placement) -> Result<(), CommandError> {
        if !self.grid.is_valid(&placement) {
            return Err(CommandError::InvalidPlacement);
        }
        self.active = Some(placement);
        Ok(())
    }

    /// Spawns the queued piece. Returns `false` (and ends the game) on collision.
    fn spawn(&mut self) -> bool {
        let (placement, next_kind) = self.spawner.spawn(self.next_kind);
        self.next_kind = next_kind;
        if !self.grid.is_valid(&placement) {
            log::info!(
                "game over: {} blocked at spawn (score {}, lines {})",
                placement.kind().as_char(),
                self.score(),
                self.cleared_lines()
            );
            self.active = None;
            self.phase = Phase::GameOver;
            return false;
        }
        self.active = Some(placement);
        self.phase = Phase::Falling;
        true
    }

    fn lock(&mut self, placement: Placement, drop_points: usize) -> LockReport {
        self.grid.lock(&placement);
        let cleared_rows = self.grid.full_rows();
        let cleared_lines = self.grid.clear_full_lines();
        debug_assert_eq!(cleared_rows.len(), cleared_lines);

        let clear = self.stats.complete_piece_drop(cleared_lines);
        log::debug!(
            "locked {} at ({}, {}), cleared {cleared_lines} line(s) for {} points",
            placement.kind().as_char(),
            placement.origin().x,
            placement.origin().y,
            clear.points
        );
        if let Some(level) = clear.new_level {
            log::info!(
                "level {level}, fall interval {}ms",
                crate::fall_interval_ms(level)
            );
        }

        self.active = None;
        self.phase = Phase::Spawning;
        let topped_out = !self.spawn();

        LockReport {
            locked: placement,
            cleared_rows,
            drop_points,
            clear_points: clear.points,
            new_level: clear.new_level,
            topped_out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BOARD_WIDTH, Cell, PieceSeed};

    const FILL: Cell = Cell::Filled(crate::Color::rgb(0x80, 0x80, 0x80));

    fn spawner() -> PieceSpawner {
        PieceSpawner::with_seed(PieceSeed::from_bytes([7; 16]))
    }

    fn falling(kind: PieceKind, grid: Grid) -> Session {
        let mut session = Session::from_parts(grid, kind, spawner());
        assert!(session.tick().unwrap().is_spawned());
        session
    }

    #[test]
    fn test_new_session_is_spawning() {
        let session = Session::with_spawner(spawner());
        assert_eq!(session.phase(), Phase::Spawning);
        assert!(session.active_placement().is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.level(), 1);
        assert_eq!(session.fall_interval(), Duration::from_millis(1000));
        assert_eq!(session.grid(), &Grid::EMPTY);
    }

    #[test]
    fn test_tick_spawns_queued_piece() {
        let mut session = Session::from_parts(Grid::EMPTY, PieceKind::T, spawner());
        assert_eq!(session.tick(), Ok(TickOutcome::Spawned(PieceKind::T)));
        assert_eq!(session.phase(), Phase::Falling);
        let active = session.active_placement().unwrap();
        assert_eq!(active.origin(), Origin::new(3, 0));
    }

    #[test]
    fn test_moves_respect_walls() {
        let mut session = falling(PieceKind::O, Grid::EMPTY);
        for _ in 0..4 {
            session.move_left().unwrap();
        }
        assert_eq!(session.move_left(), Err(CommandError::InvalidPlacement));
        assert_eq!(session.active_placement().unwrap().origin().x, 0);

        for _ in 0..8 {
            session.move_right().unwrap();
        }
        assert_eq!(session.move_right(), Err(CommandError::InvalidPlacement));
        assert_eq!(session.active_placement().unwrap().origin().x, 8);
    }

    #[test]
    fn test_soft_drop_awards_one_point_per_row() {
        let mut session = falling(PieceKind::O, Grid::EMPTY);
        for _ in 0..18 {
            session.soft_drop_step().unwrap();
        }
        assert_eq!(session.score(), 18);
        assert_eq!(
            session.soft_drop_step(),
            Err(CommandError::InvalidPlacement)
        );
        assert_eq!(session.score(), 18);
        assert!(session.phase().is_falling());
    }

    #[test]
    fn test_rotation_rejected_against_wall_keeps_shape() {
        let mut session = falling(PieceKind::I, Grid::EMPTY);
        session.rotate().unwrap();
        while session.move_right().is_ok() {}
        let before = *session.active_placement().unwrap();
        assert_eq!(before.origin().x, 9);
        assert_eq!(session.rotate(), Err(CommandError::InvalidPlacement));
        assert_eq!(session.active_placement(), Some(&before));
    }

    #[test]
    fn test_hard_drop_scenario() {
        let mut session = falling(PieceKind::I, Grid::EMPTY);
        assert_eq!(
            session.active_placement().unwrap().origin(),
            Origin::new(3, 0)
        );
        let report = session.hard_drop().unwrap();
        assert_eq!(report.locked.origin(), Origin::new(3, 19));
        assert_eq!(report.drop_points, 38);
        assert_eq!(report.cleared_lines(), 0);
        assert!(!report.topped_out);
        assert_eq!(session.score(), 38);
        for x in 0..BOARD_WIDTH {
            let expected = (3..=6).contains(&x);
            assert_eq!(!session.grid().cell(x, 19).is_empty(), expected, "x={x}");
        }
        assert_eq!(session.phase(), Phase::Falling);
    }

    #[test]
    fn test_gravity_locks_when_blocked() {
        let mut session = falling(PieceKind::O, Grid::EMPTY);
        for _ in 0..18 {
            assert_eq!(session.tick(), Ok(TickOutcome::Fell));
        }
        let Ok(TickOutcome::Locked(report)) = session.tick() else {
            panic!("expected lock");
        };
        assert_eq!(report.drop_points, 0);
        assert_eq!(report.locked.origin(), Origin::new(4, 18));
        assert_eq!(session.score(), 18);
        assert_eq!(session.grid().filled_cells(), 4);
    }

    #[test]
    fn test_line_clear_scores_and_compacts() {
        let mut grid = Grid::EMPTY;
        for x in (0..BOARD_WIDTH).filter(|x| !(3..=6).contains(x)) {
            grid.set_cell(x, 19, FILL);
        }
        grid.set_cell(0, 18, FILL);
        let mut session = falling(PieceKind::I, grid);
        let report = session.hard_drop().unwrap();
        assert_eq!(report.cleared_rows.as_slice(), &[19]);
        assert_eq!(report.clear_points, 40);
        assert_eq!(session.score(), 38 + 40);
        assert_eq!(session.cleared_lines(), 1);
        assert_eq!(session.grid().cell(0, 19), FILL);
        assert_eq!(session.grid().filled_cells(), 1);
    }

    #[test]
    fn test_spawn_collision_is_game_over() {
        let mut grid = Grid::EMPTY;
        for y in 0..2 {
            for x in 0..BOARD_WIDTH {
                grid.set_cell(x, y, FILL);
            }
        }
        let mut session = Session::from_parts(grid, PieceKind::T, spawner());
        assert_eq!(session.tick(), Ok(TickOutcome::ToppedOut));
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(session.active_placement().is_none());
    }

    #[test]
    fn test_game_over_accepts_only_new_game() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(4, 0, FILL);
        let mut session = Session::from_parts(grid, PieceKind::O, spawner());
        assert_eq!(session.tick(), Ok(TickOutcome::ToppedOut));

        let illegal = Err(CommandError::IllegalCommandForPhase {
            phase: Phase::GameOver,
        });
        assert_eq!(session.move_left(), illegal);
        assert_eq!(session.rotate(), illegal);
        assert_eq!(session.pause(), illegal);
        assert_eq!(session.resume(), illegal);
        assert_eq!(session.tick().map(|_| ()), illegal);
        assert_eq!(session.hard_drop().map(|_| ()), illegal);

        session.new_game();
        assert_eq!(session.phase(), Phase::Spawning);
        assert_eq!(session.grid(), &Grid::EMPTY);
        assert!(session.tick().unwrap().is_spawned());
    }

    #[test]
    fn test_pause_freezes_and_resume_restores() {
        let mut session = falling(PieceKind::T, Grid::EMPTY);
        let before = *session.active_placement().unwrap();
        session.pause().unwrap();

        let illegal = Err(CommandError::IllegalCommandForPhase {
            phase: Phase::Paused,
        });
        assert_eq!(session.tick().map(|_| ()), illegal);
        assert_eq!(session.move_right(), illegal);
        assert_eq!(session.soft_drop_step(), illegal);
        assert_eq!(session.pause(), illegal);
        assert_eq!(session.active_placement(), Some(&before));

        session.resume().unwrap();
        assert_eq!(session.phase(), Phase::Falling);
        assert_eq!(session.tick(), Ok(TickOutcome::Fell));
    }

    #[test]
    fn test_pause_from_spawning_resumes_to_spawning() {
        let mut session = Session::with_spawner(spawner());
        session.toggle_pause().unwrap();
        assert_eq!(session.phase(), Phase::Paused);
        session.toggle_pause().unwrap();
        assert_eq!(session.phase(), Phase::Spawning);
    }

    #[test]
    fn test_new_game_while_paused() {
        let mut session = falling(PieceKind::T, Grid::EMPTY);
        session.hard_drop().unwrap();
        session.pause().unwrap();
        session.new_game();
        assert_eq!(session.phase(), Phase::Spawning);
        assert_eq!(session.score(), 0);
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_commands_rejected_while_spawning() {
        let mut session = Session::with_spawner(spawner());
        let illegal = Err(CommandError::IllegalCommandForPhase {
            phase: Phase::Spawning,
        });
        assert_eq!(session.move_left(), illegal);
        assert_eq!(session.rotate(), illegal);
        assert_eq!(session.hard_drop().map(|_| ()), illegal);
    }

    #[test]
    fn test_drop_preview_matches_hard_drop() {
        let mut session = falling(PieceKind::L, Grid::EMPTY);
        session.rotate().unwrap();
        let preview = session.drop_preview().unwrap();
        let report = session.hard_drop().unwrap();
        assert_eq!(report.locked, preview);
    }

    #[test]
    fn test_snapshot_serializes() {
        let session = falling(PieceKind::S, Grid::EMPTY);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Falling);
        assert_eq!(snapshot.fall_interval_ms, 1000);
        let active = snapshot.active.as_ref().unwrap();
        assert_eq!(active.cells, [(4, 0), (5, 0), (3, 1), (4, 1)]);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
