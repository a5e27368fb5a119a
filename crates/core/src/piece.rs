//! Active piece: a shape anchored at a board position.

use crate::shape::{Shape, SPAWN_POSITION};
use crate::types::ShapeKind;

/// A falling piece
///
/// `(x, y)` is the top-left corner of the shape's bounding box in board
/// coordinates. `y` may be negative while a piece is above the visible board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a piece of `kind` in its template orientation at the spawn anchor
    pub fn spawn(kind: ShapeKind) -> Self {
        Self {
            kind,
            shape: Shape::template(kind),
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Board coordinates of every filled cell.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .filled()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Copy of this piece shifted by (dx, dy).
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Copy of this piece with its shape rotated clockwise in place (same anchor).
    pub fn rotated_cw(&self) -> Self {
        Self {
            shape: self.shape.rotate_cw(),
            ..*self
        }
    }
}
