//! Jafris (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so binaries, integration tests and
//! benches can write `jafris::core::GameMachine` and friends. The implementation
//! lives in dedicated crates under `crates/`.

pub use jafris_core as core;
pub use jafris_input as input;
pub use jafris_runtime as runtime;
pub use jafris_term as term;
pub use jafris_types as types;
