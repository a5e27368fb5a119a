//! Collision and placement - pure functions over a board and a piece
//!
//! Blocking rules:
//! - columns outside `0..BOARD_WIDTH` block
//! - rows at or below `BOARD_HEIGHT` block
//! - occupied cells block
//! - rows above the board (`y < 0`) never block, so a piece may hang off the top

use crate::board::Board;
use crate::piece::Piece;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Whether a single board coordinate is blocked for a piece cell.
#[inline]
pub fn is_blocked(board: &Board, x: i8, y: i8) -> bool {
    if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
        return true;
    }
    y >= 0 && board.is_occupied(x, y)
}

/// True iff any filled cell of `piece` is blocked on `board`.
pub fn collides(board: &Board, piece: &Piece) -> bool {
    piece.cells().any(|(x, y)| is_blocked(board, x, y))
}

/// The lowest `y` the piece can occupy by falling straight down from where it is.
///
/// Works on a copy, so the caller's piece is left untouched. If the piece already
/// collides, its current `y - 1` is returned, mirroring a one-step probe.
pub fn lowest_valid_y(board: &Board, piece: &Piece) -> i8 {
    let mut probe = *piece;
    while !collides(board, &probe) {
        probe.y += 1;
    }
    probe.y - 1
}

/// Write every filled cell of `piece` into the board.
///
/// # Panics
///
/// Panics if a cell lies outside the board. The piece must have passed
/// [`collides`] first; anything else is an engine bug.
pub fn place(board: &mut Board, piece: &Piece) {
    debug_assert!(!collides(board, piece), "placing a colliding piece");
    for (x, y) in piece.cells() {
        board.set_occupied(x, y, piece.kind);
    }
}
