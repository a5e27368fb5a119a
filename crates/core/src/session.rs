//! Game session - everything that belongs to one game in progress
//!
//! The session is plain data plus the spawn rule. It knows nothing about phases or
//! timers; [`GameMachine`](crate::machine::GameMachine) decides when to call it.

use crate::board::Board;
use crate::collision::collides;
use crate::piece::Piece;
use crate::rng::ShapeSource;
use crate::scoring::ScoreState;
use crate::types::ShapeKind;

#[derive(Debug, Clone)]
pub struct GameSession {
    pub board: Board,
    pub current: Option<Piece>,
    pub next: Option<ShapeKind>,
    pub score: ScoreState,
    source: ShapeSource,
}

impl GameSession {
    pub fn new(source: ShapeSource) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            score: ScoreState::new(),
            source,
        }
    }

    /// Empty board, zero score, no pieces.
    pub fn reset(&mut self) {
        self.board.clear();
        self.score.reset();
        self.current = None;
        self.next = None;
    }

    /// Reset and deal the first piece. Returns `false` if it cannot be placed.
    ///
    /// The shape source keeps running, so a new game deals fresh shapes.
    pub fn begin(&mut self) -> bool {
        self.reset();
        self.next = Some(self.source.draw());
        self.spawn_next()
    }

    /// Promote the next shape to the current piece at the spawn anchor and draw a
    /// new next shape.
    ///
    /// Returns `false` when the new piece collides immediately. The piece is kept
    /// as current anyway so it can still be drawn.
    pub fn spawn_next(&mut self) -> bool {
        let kind = match self.next {
            Some(kind) => kind,
            None => self.source.draw(),
        };
        let piece = Piece::spawn(kind);
        self.current = Some(piece);
        self.next = Some(self.source.draw());
        !collides(&self.board, &piece)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(ShapeSource::default())
    }
}
