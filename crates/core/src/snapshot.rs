//! Snapshot - a plain copy of everything a renderer needs for one frame
//!
//! Filled by [`GameMachine::snapshot_into`](crate::machine::GameMachine::snapshot_into)
//! without allocating, so a front end can keep one and refill it every frame.

use std::time::Duration;

use crate::piece::Piece;
use crate::types::{Cell, Direction, Phase, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};

pub type Grid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

/// Copyable view of a machine for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: Grid,
    pub current: Option<Piece>,
    /// Landing row of `current`, when the ghost piece is enabled.
    pub ghost_y: Option<i8>,
    pub next: Option<ShapeKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub phase: Phase,
    pub quit_pending: bool,
    pub soft_drop: bool,
    pub held: Option<Direction>,
    /// Gravity interval at the current level, ignoring soft drop.
    pub gravity_interval: Duration,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing && !self.quit_pending
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            current: None,
            ghost_y: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            phase: Phase::Initial,
            quit_pending: false,
            soft_drop: false,
            held: None,
            gravity_interval: Duration::ZERO,
        }
    }
}
