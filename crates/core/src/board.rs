//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is empty or occupied (remembering the
//! shape kind that filled it). Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//!
//! The board itself has no notion of walls or "above the board": out-of-range queries
//! simply report "not occupied". Blocking rules live in [`crate::collision`].

use arrayvec::ArrayVec;

use crate::types::{Cell, ShapeKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices removed by one line clear, in the order they were found (bottom first).
pub type ClearedRows = ArrayVec<usize, HEIGHT>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Check if position is in bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Mark a cell as filled by `kind`.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is outside the board. Callers are expected to have run a
    /// collision check first, so an out-of-range write is an engine bug.
    pub fn set_occupied(&mut self, x: i8, y: i8, kind: ShapeKind) {
        let Some(idx) = Self::index(x, y) else {
            panic!("set_occupied out of bounds: ({}, {})", x, y);
        };
        self.cells[idx] = Some(kind);
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Borrow one row of cells.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Remove row `y`, shifting every row above it down by one.
    ///
    /// The top row is left holding the removed contents until
    /// [`insert_empty_row_at_top`](Self::insert_empty_row_at_top) resets it; the two
    /// calls always come as a pair so the row count never changes.
    pub fn remove_row(&mut self, y: usize) {
        if y >= HEIGHT {
            return;
        }
        // Rotating rows 0..=y right by one row moves row y to the top and slides
        // the rows above it down, all in place.
        self.cells[..(y + 1) * WIDTH].rotate_right(WIDTH);
    }

    /// Reset the top row to empty.
    pub fn insert_empty_row_at_top(&mut self) {
        self.cells[..WIDTH].fill(None);
    }

    /// Clear every full row, scanning bottom to top.
    ///
    /// Returns the original indices of the removed rows (bottom first). A row that
    /// drops into a just-cleared slot is re-checked before moving up.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = HEIGHT;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.remove_row(row);
                self.insert_empty_row_at_top();
                cleared.push(row - cleared.len());
            } else {
                y -= 1;
            }
        }
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Copy the board into a row-major 2D grid (snapshot hot path, no allocation).
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
