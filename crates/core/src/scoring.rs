//! Scoring module - classic marathon scoring and the NES-style gravity curve
//!
//! - Line clears award `LINE_SCORES[n] * level`, using the level *before* the clear.
//! - Soft drop awards 1 point per cell, hard drop 2 points per cell.
//! - Level is `lines / 10 + 1`.

use std::time::Duration;

use crate::types::{
    FRAMES_PER_SECOND, GRAVITY_FRAMES_FLOOR, GRAVITY_FRAMES_START, GRAVITY_FRAMES_STEP,
    GRAVITY_LINEAR_LEVELS, HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL, LINE_SCORES,
    SOFT_DROP_POINTS_PER_CELL,
};

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn line_clear_points(lines: u32, level: u32) -> u32 {
    if lines == 0 || lines as usize >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines as usize].saturating_mul(level)
}

/// Calculate drop score
/// soft drop: +1 per cell
/// hard drop: +2 per cell
pub fn drop_points(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS_PER_CELL
    } else {
        SOFT_DROP_POINTS_PER_CELL
    };
    cells.saturating_mul(per_cell)
}

/// Level for a running total of cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Frames per row at `level` (1-based) on the 60 fps curve.
pub fn gravity_frames(level: u32) -> u32 {
    let steps = level.saturating_sub(1);
    if steps < GRAVITY_LINEAR_LEVELS {
        GRAVITY_FRAMES_START - GRAVITY_FRAMES_STEP * steps
    } else {
        GRAVITY_FRAMES_FLOOR
    }
}

/// Gravity interval for a level
///
/// Level 1 is 48 frames (800ms), each level removes 5 frames through level 9
/// (8 frames), and level 10 onwards is fixed at 6 frames (100ms).
pub fn gravity_interval(level: u32) -> Duration {
    let frames = gravity_frames(level) as u64;
    Duration::from_micros(frames * 1_000_000 / FRAMES_PER_SECOND)
}

/// Soft drop interval: base interval divided by `divisor`, never below 1ms
pub fn soft_drop_interval(base: Duration, divisor: u32) -> Duration {
    (base / divisor.max(1)).max(Duration::from_millis(1))
}

/// Result of crediting one line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearAward {
    pub points: u32,
    /// Level after the clear, if it changed.
    pub new_level: Option<u32>,
}

/// Score, level and total lines for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    score: u32,
    level: u32,
    lines: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Credit soft or hard drop distance.
    pub fn add_drop(&mut self, cells: u32, is_hard_drop: bool) -> u32 {
        let points = drop_points(cells, is_hard_drop);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Credit a line clear of `rows` rows at the current level, then advance
    /// the line total and recompute the level.
    pub fn add_line_clear(&mut self, rows: u32) -> LineClearAward {
        if rows == 0 {
            return LineClearAward::default();
        }

        let points = line_clear_points(rows, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(rows);

        let level = level_for_lines(self.lines);
        let new_level = (level != self.level).then_some(level);
        self.level = level;

        LineClearAward { points, new_level }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}
