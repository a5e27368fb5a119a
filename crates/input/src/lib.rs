//! Terminal input (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::Command`]s. Which command a key
//! produces depends on the game phase and on whether the quit dialog is open. Held
//! keys (left, right, down) map to a press command and a release command; for
//! terminals that never report releases, [`InputHandler`] synthesises them.

pub mod handler;
pub mod map;

pub use jafris_types as types;

pub use handler::InputHandler;
pub use map::{map_key, should_exit, InputContext};
