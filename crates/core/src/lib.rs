//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the game and the state machine that drives them.
//! It has no dependencies on the terminal, the async runtime, or any I/O:
//!
//! - **Deterministic**: a seed (or a scripted shape sequence) reproduces a whole game
//! - **Clock-agnostic**: time enters only through the [`Scheduler`] trait
//! - **Testable**: [`ManualScheduler`] is a virtual clock, so timing is exact in tests
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 occupancy grid, row removal and line clearing
//! - [`shape`]: the five shape templates and clockwise rotation
//! - [`piece`]: a shape anchored at a board position
//! - [`collision`]: blocking rules, landing row and placement
//! - [`scoring`]: line clear points, drop points, levels and gravity intervals
//! - [`rng`]: seeded shape selection
//! - [`timer`]: the scheduler trait, timer handles and the virtual clock
//! - [`session`]: one game's board, pieces and score
//! - [`machine`]: phases, commands and timer handling
//! - [`snapshot`]: copyable state for renderers
//! - [`config`]: tunables and environment overrides
//!
//! # Game Rules
//!
//! - Five shapes (T, O, L, J, I) drawn uniformly at random
//! - Clockwise rotation only, rejected on collision (no wall kicks)
//! - Pieces may hang above the board; walls, floor and the stack block
//! - Classic line scores (40/100/300/1200 x level), +1 per soft drop row,
//!   +2 per hard drop row
//! - A level every 10 lines; gravity speeds up on the NES frame curve
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use jafris_core::{GameConfig, GameMachine, ShapeSource};
//! use jafris_core::timer::ManualScheduler;
//! use jafris_types::{Command, Phase, ShapeKind};
//!
//! let mut game = GameMachine::with_source(
//!     ManualScheduler::new(),
//!     GameConfig::default(),
//!     ShapeSource::scripted([ShapeKind::I]),
//! );
//! game.apply(Command::Start);
//!
//! // Gravity moves the piece down one row every 800ms at level 1.
//! game.advance(Duration::from_millis(1600));
//! assert_eq!(game.current().unwrap().y, 2);
//!
//! // Hard drop from row 2 to the floor scores 2 points per row.
//! game.apply(Command::HardDrop);
//! assert_eq!(game.score(), 34);
//! assert_eq!(game.phase(), Phase::Playing);
//! ```

pub mod board;
pub mod collision;
pub mod config;
pub mod machine;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod shape;
pub mod snapshot;
pub mod timer;

pub use jafris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::{collides, lowest_valid_y, place};
pub use config::{ConfigError, GameConfig};
pub use machine::GameMachine;
pub use piece::Piece;
pub use rng::{ShapeSource, SimpleRng};
pub use scoring::{gravity_interval, line_clear_points, ScoreState};
pub use session::GameSession;
pub use shape::Shape;
pub use snapshot::GameSnapshot;
pub use timer::{ManualScheduler, Scheduler, TimerHandle, TimerSlots};
