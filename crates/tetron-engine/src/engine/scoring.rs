use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base points for clearing 1, 2, 3 and 4 lines at once (multiplied by level).
pub const LINE_CLEAR_SCORES: [usize; 4] = [40, 100, 300, 1200];
/// Points per row for an accepted soft-drop or gravity step.
pub const SOFT_DROP_POINTS: usize = 1;
/// Points per row descended by a hard drop.
pub const HARD_DROP_POINTS: usize = 2;
/// Lines needed to advance one level.
pub const LINES_PER_LEVEL: usize = 10;
/// Fall interval at level 1.
pub const BASE_FALL_INTERVAL_MS: u64 = 1000;
/// Fall interval reduction per level.
pub const FALL_INTERVAL_STEP_MS: u64 = 100;
/// Floor of the fall interval.
pub const MIN_FALL_INTERVAL_MS: u64 = 100;

/// Points for clearing `lines_cleared` rows at `level`.
///
/// Zero lines yields zero. Clears larger than four (impossible with a single
/// tetromino) are paid at the four-line rate.
///
/// ```
/// use tetron_engine::score_for_clear;
///
/// assert_eq!(score_for_clear(1, 1), 40);
/// assert_eq!(score_for_clear(2, 3), 300);
/// assert_eq!(score_for_clear(4, 1), 1200);
/// assert_eq!(score_for_clear(0, 7), 0);
/// ```
#[must_use]
pub fn score_for_clear(lines_cleared: usize, level: usize) -> usize {
    if lines_cleared == 0 {
        return 0;
    }
    let index = usize::min(lines_cleared, LINE_CLEAR_SCORES.len()) - 1;
    LINE_CLEAR_SCORES[index] * level
}

/// Level reached after `total_lines` cleared lines (starting at 1).
#[must_use]
pub const fn level_for_lines(total_lines: usize) -> usize {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity period in milliseconds at `level`:
/// `max(100, 1000 - (level - 1) * 100)`.
#[must_use]
pub fn fall_interval_ms(level: usize) -> u64 {
    let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
    BASE_FALL_INTERVAL_MS
        .saturating_sub(steps.saturating_mul(FALL_INTERVAL_STEP_MS))
        .max(MIN_FALL_INTERVAL_MS)
}

/// Gravity period at `level`.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    Duration::from_millis(fall_interval_ms(level))
}

/// Score change produced by one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearScore {
    /// Line-clear points awarded (already multiplied by the level in effect).
    pub points: usize,
    /// Level after the clear, when it changed.
    pub new_level: Option<usize>,
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// - **Score**: drop points plus line-clear points
/// - **Level**: derived from total lines cleared (1 level per 10 lines, starting at 1)
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of drops by number of lines cleared
///
/// Score and line count never decrease.
///
/// # Example
///
/// ```
/// use tetron_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4); // four lines at level 1
///
/// assert_eq!(stats.score(), 1200);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        level_for_lines(self.total_cleared_lines)
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        fall_interval(self.level())
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by lines cleared.
    ///
    /// Index 0 counts locks that cleared nothing; index 4 counts four-line clears.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Awards drop points for `rows` rows descended at `points_per_row`.
    ///
    /// Returns the points added.
    pub fn add_drop_points(&mut self, rows: usize, points_per_row: usize) -> usize {
        let points = rows * points_per_row;
        self.score += points;
        points
    }

    /// Updates statistics after a piece lock that cleared `cleared_lines` rows.
    ///
    /// Line-clear points use the level in effect before the clear.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> ClearScore {
        let level = self.level();
        let points = score_for_clear(cleared_lines, level);

        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }
        self.score += points;

        let new_level = self.level();
        ClearScore {
            points,
            new_level: (new_level != level).then_some(new_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(score_for_clear(0, 1), 0);
        assert_eq!(score_for_clear(1, 1), 40);
        assert_eq!(score_for_clear(2, 1), 100);
        assert_eq!(score_for_clear(3, 1), 300);
        assert_eq!(score_for_clear(4, 1), 1200);
        assert_eq!(score_for_clear(2, 3), 300);
        assert_eq!(score_for_clear(0, 99), 0);
    }

    #[test]
    fn test_score_beyond_four_lines_uses_last_entry() {
        assert_eq!(score_for_clear(5, 2), 2400);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
    }

    #[test]
    fn test_fall_interval() {
        assert_eq!(fall_interval_ms(1), 1000);
        assert_eq!(fall_interval_ms(3), 800);
        assert_eq!(fall_interval_ms(9), 200);
        assert_eq!(fall_interval_ms(10), 100);
        assert_eq!(fall_interval_ms(50), 100);
        assert_eq!(fall_interval(2), Duration::from_millis(900));
    }

    #[test]
    fn test_stats_level_after_25_lines() {
        let mut stats = GameStats::new();
        for _ in 0..6 {
            stats.complete_piece_drop(4);
        }
        stats.complete_piece_drop(1);
        assert_eq!(stats.total_cleared_lines(), 25);
        assert_eq!(stats.level(), 3);
        assert_eq!(stats.fall_interval(), Duration::from_millis(800));
    }

    #[test]
    fn test_clear_points_use_level_before_clear() {
        let mut stats = GameStats::new();
        for _ in 0..2 {
            stats.complete_piece_drop(4);
        }
        assert_eq!(stats.level(), 1);
        // 8 -> 12 lines: paid at level 1, then level 2
        let clear = stats.complete_piece_drop(4);
        assert_eq!(clear.points, 1200);
        assert_eq!(clear.new_level, Some(2));

        let clear = stats.complete_piece_drop(1);
        assert_eq!(clear.points, 80);
        assert_eq!(clear.new_level, None);
    }

    #[test]
    fn test_drop_points() {
        let mut stats = GameStats::new();
        assert_eq!(stats.add_drop_points(19, HARD_DROP_POINTS), 38);
        assert_eq!(stats.add_drop_points(1, SOFT_DROP_POINTS), 1);
        assert_eq!(stats.score(), 39);
        assert_eq!(stats.completed_pieces(), 0);
    }

    #[test]
    fn test_line_cleared_counter() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(2);
        assert_eq!(stats.line_cleared_counter(), &[2, 0, 1, 0, 0]);
        assert_eq!(stats.completed_pieces(), 3);
    }
}
