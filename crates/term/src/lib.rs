//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget and
//! layout libraries and instead renders into a simple framebuffer that is flushed
//! to the terminal.
//!
//! - [`GameView`] is pure: snapshot in, framebuffer out
//! - [`TerminalRenderer`] owns the terminal and writes only the rows that changed
//! - Board cells are 2 columns wide by default to keep them roughly square

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use jafris_core as core;
pub use jafris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{shape_color, AnchorY, BoardRect, GameView, Viewport};
pub use renderer::{changed_rows, encode_full_into, encode_rows_into, TerminalRenderer};
