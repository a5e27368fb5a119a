//! Shape module - the five fixed templates and clockwise rotation
//!
//! A shape is a small boolean matrix (at most 4x4) stored inline so pieces stay `Copy`.
//! Rotation is a pure transform: it returns a new matrix and never checks collision.

use crate::types::{ShapeKind, BOARD_WIDTH};

/// Largest side length of any template.
pub const MAX_SIDE: usize = 4;

/// An immutable filled/empty matrix describing one orientation of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    height: u8,
    width: u8,
    cells: [[bool; MAX_SIDE]; MAX_SIDE],
}

impl Shape {
    /// Build a shape from rows of 0/1 values.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, ragged, or larger than 4x4.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_SIDE, "bad shape height");
        let width = rows[0].len();
        assert!(width > 0 && width <= MAX_SIDE, "bad shape width");

        let mut cells = [[false; MAX_SIDE]; MAX_SIDE];
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), width, "ragged shape row {}", y);
            for (x, &v) in row.iter().enumerate() {
                cells[y][x] = v != 0;
            }
        }

        Self {
            height: rows.len() as u8,
            width: width as u8,
            cells,
        }
    }

    /// The spawn orientation of a template.
    pub fn template(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::T => Self::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
            ShapeKind::O => Self::from_rows(&[&[1, 1], &[1, 1]]),
            ShapeKind::L => Self::from_rows(&[&[1, 0], &[1, 0], &[1, 1]]),
            ShapeKind::J => Self::from_rows(&[&[0, 1], &[0, 1], &[1, 1]]),
            ShapeKind::I => Self::from_rows(&[&[1, 1, 1, 1]]),
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Whether local cell (x, y) is filled; false outside the matrix.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        x < self.width as usize && y < self.height as usize && self.cells[y][x]
    }

    /// Iterate the local (dx, dy) offsets of filled cells, row by row.
    pub fn filled(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.height as usize).flat_map(move |y| {
            (0..self.width as usize)
                .filter(move |&x| self.cells[y][x])
                .map(move |x| (x as i8, y as i8))
        })
    }

    /// Rotate 90° clockwise: `new[r][c] = old[height - 1 - c][r]`.
    pub fn rotate_cw(&self) -> Self {
        let h = self.height as usize;
        let w = self.width as usize;
        let mut cells = [[false; MAX_SIDE]; MAX_SIDE];
        for (r, row) in cells.iter_mut().enumerate().take(w) {
            for (c, cell) in row.iter_mut().enumerate().take(h) {
                *cell = self.cells[h - 1 - c][r];
            }
        }
        Self {
            height: self.width,
            width: self.height,
            cells,
        }
    }
}

/// Spawn anchor for new pieces (x, y): column `cols / 2 - 1`, row 0.
pub const SPAWN_POSITION: (i8, i8) = ((BOARD_WIDTH / 2) as i8 - 1, 0);
