// src/engine/mod.rs

//! Orchestration engine for concrun.
//!
//! - [`core`] is the pure per-command retry state machine.
//! - [`worker`] drives that state machine for one command, streaming every
//!   attempt's [`ExecResult`] and applying fail-fast cancellation.
//! - [`runtime`] resolves the shell, launches one worker per command on a
//!   shared cancellation token and closes the output streams once all
//!   workers are done.

pub mod core;
pub mod result;
pub mod runtime;
pub mod worker;

pub use self::core::{CommandState, Terminal, Transition};
pub use result::ExecResult;
pub use runtime::{Executor, RESULT_CHANNEL_CAPACITY, RunReport, orchestrate};
pub use worker::Worker;
