// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`shell`] resolves the configured shell to an executable path.
//! - [`attempt`] runs one attempt of a command with `tokio::process`,
//!   capturing its output and honouring cancellation.
//! - [`backend`] provides the `AttemptBackend` trait the engine talks to and
//!   the production `ShellBackend`.

pub mod attempt;
pub mod backend;
pub mod shell;

pub use attempt::{AttemptOutput, run_attempt};
pub use backend::{AttemptBackend, ShellBackend};
pub use shell::{resolve_shell, resolve_shell_in};
