//! Async runtime integration.
//!
//! Bridges the clock-agnostic state machine with tokio:
//!
//! - [`TokioScheduler`] implements the core `Scheduler` trait with interval tasks
//! - [`Driver`] owns a machine on one task and serialises commands and timer fires
//! - [`EventLog`] appends cue events to a JSON-lines file

pub mod driver;
pub mod event_log;
pub mod scheduler;

pub use jafris_core as core;
pub use jafris_types as types;

pub use driver::{spawn_game, Driver, GameHandle};
pub use event_log::EventLog;
pub use scheduler::{TimerFires, TokioScheduler};
