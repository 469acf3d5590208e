//! Greedy one-piece lookahead player.
//!
//! For the falling piece the bot enumerates every rotation and column reachable
//! by rotating in place and then shifting sideways, simulates the hard drop on a
//! copy of the grid, and keeps the landing with the best heuristic score.

use tetron_engine::{BOARD_HEIGHT, BOARD_WIDTH, Grid, Placement, Session};

// Linear weights over the landing features (higher score is better).
const WEIGHT_AGGREGATE_HEIGHT: f64 = -0.51;
const WEIGHT_CLEARED_LINES: f64 = 0.76;
const WEIGHT_HOLES: f64 = -0.36;
const WEIGHT_BUMPINESS: f64 = -0.18;

/// Command sequence that brings the falling piece to a landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub rotations: usize,
    pub shift: i32,
}

/// Board metrics after a candidate landing, lines already cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingAnalysis {
    cleared_lines: u32,
    aggregate_height: u32,
    holes: u32,
    bumpiness: u32,
}

impl LandingAnalysis {
    pub fn from_grid(before: &Grid, landing: &Placement) -> Self {
        let mut grid = before.clone();
        grid.lock(landing);
        let cleared_lines = u32::try_from(grid.clear_full_lines()).unwrap_or(u32::MAX);

        let heights = column_heights(&grid);
        let aggregate_height = heights.iter().sum();
        let bumpiness = heights
            .windows(2)
            .map(|pair| pair[0].abs_diff(pair[1]))
            .sum();
        let holes = count_holes(&grid);

        Self {
            cleared_lines,
            aggregate_height,
            holes,
            bumpiness,
        }
    }

    pub fn score(&self) -> f64 {
        WEIGHT_AGGREGATE_HEIGHT * f64::from(self.aggregate_height)
            + WEIGHT_CLEARED_LINES * f64::from(self.cleared_lines)
            + WEIGHT_HOLES * f64::from(self.holes)
            + WEIGHT_BUMPINESS * f64::from(self.bumpiness)
    }
}

fn column_heights(grid: &Grid) -> [u32; BOARD_WIDTH] {
    let mut heights = [0; BOARD_WIDTH];
    for (x, height) in heights.iter_mut().enumerate() {
        if let Some(top) = (0..BOARD_HEIGHT).find(|&y| !grid.cell(x, y).is_empty()) {
            *height = u32::try_from(BOARD_HEIGHT - top).unwrap_or(u32::MAX);
        }
    }
    heights
}

fn count_holes(grid: &Grid) -> u32 {
    let mut holes = 0;
    for x in 0..BOARD_WIDTH {
        let mut covered = false;
        for y in 0..BOARD_HEIGHT {
            let empty = grid.cell(x, y).is_empty();
            if !empty {
                covered = true;
            } else if covered {
                holes += 1;
            }
        }
    }
    holes
}

/// Returns the placement reached by `mv`, or `None` if a step is blocked.
fn reach(grid: &Grid, start: Placement, mv: Move) -> Option<Placement> {
    let mut placement = start;
    for _ in 0..mv.rotations {
        placement = placement.rotated_cw();
        if !grid.is_valid(&placement) {
            return None;
        }
    }
    let step = mv.shift.signum();
    for _ in 0..mv.shift.abs() {
        placement = placement.shifted(step, 0);
        if !grid.is_valid(&placement) {
            return None;
        }
    }
    Some(placement.drop_position(grid))
}

/// Picks the best reachable landing for the falling piece.
///
/// Returns `None` when no piece is falling.
pub fn select_best_move(session: &Session) -> Option<(Move, LandingAnalysis)> {
    let start = *session.active_placement()?;
    let grid = session.grid();
    let max_shift = i32::try_from(BOARD_WIDTH).unwrap_or(i32::MAX);

    let mut best: Option<(Move, LandingAnalysis, f64)> = None;
    for rotations in 0..4 {
        for shift in -max_shift..=max_shift {
            let mv = Move { rotations, shift };
            let Some(landing) = reach(grid, start, mv) else {
                continue;
            };
            let analysis = LandingAnalysis::from_grid(grid, &landing);
            let score = analysis.score();
            if best.is_none_or(|(_, _, best_score)| score > best_score) {
                best = Some((mv, analysis, score));
            }
        }
    }
    best.map(|(mv, analysis, _)| (mv, analysis))
}

/// Plays `mv` through the session's command interface and hard-drops.
pub fn apply_move(session: &mut Session, mv: Move) -> anyhow::Result<()> {
    for _ in 0..mv.rotations {
        session.rotate()?;
    }
    for _ in 0..mv.shift.abs() {
        if mv.shift < 0 {
            session.move_left()?;
        } else {
            session.move_right()?;
        }
    }
    session.hard_drop()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tetron_engine::{Cell, PieceKind, PieceSeed, PieceSpawner};

    use super::*;

    const FILL: Cell = Cell::Filled(PieceKind::Z.color());

    fn session_with(grid: Grid, kind: PieceKind) -> Session {
        let spawner = PieceSpawner::with_seed(PieceSeed::from_bytes([1; 16]));
        let mut session = Session::from_parts(grid, kind, spawner);
        session.tick().unwrap();
        session
    }

    #[test]
    fn test_analysis_counts_holes_and_heights() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(0, 18, FILL);
        let landing = *session_with(Grid::EMPTY, PieceKind::O)
            .drop_preview()
            .as_ref()
            .unwrap();
        let analysis = LandingAnalysis::from_grid(&grid, &landing);
        assert_eq!(analysis.holes, 1);
        assert_eq!(analysis.aggregate_height, 2 + 2 + 2);
        assert_eq!(analysis.cleared_lines, 0);
    }

    #[test]
    fn test_bot_takes_the_tetris() {
        let mut grid = Grid::EMPTY;
        for y in 16..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH - 1 {
                grid.set_cell(x, y, FILL);
            }
        }
        let mut session = session_with(grid, PieceKind::I);
        let (mv, analysis) = select_best_move(&session).unwrap();
        assert_eq!(analysis.cleared_lines, 4);

        apply_move(&mut session, mv).unwrap();
        assert_eq!(session.cleared_lines(), 4);
        assert_eq!(session.grid(), &Grid::EMPTY);
    }

    #[test]
    fn test_no_move_without_falling_piece() {
        let session = Session::with_spawner(PieceSpawner::with_seed(PieceSeed::from_bytes(
            [1; 16],
        )));
        assert!(select_best_move(&session).is_none());
    }
}
