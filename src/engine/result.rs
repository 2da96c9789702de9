// src/engine/result.rs

use std::time::{Duration, SystemTime};

use crate::exec::AttemptOutput;
use crate::types::Outcome;

/// Record of exactly one execution attempt of one command.
///
/// A command produces one `ExecResult` per attempt; `retries` counts the
/// attempts that came before this one. Results are never mutated once they
/// have been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Position of the command in the configured command list.
    pub index: usize,
    pub command: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub combined: Vec<u8>,
    pub outcome: Outcome,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
    pub retries: u32,
}

impl ExecResult {
    pub fn from_attempt(index: usize, command: String, retries: u32, output: AttemptOutput) -> Self {
        Self {
            index,
            command,
            stdout: output.stdout,
            stderr: output.stderr,
            combined: output.combined,
            outcome: output.outcome,
            start_time: output.start_time,
            end_time: output.end_time,
            retries,
        }
    }

    /// Exit code with `-1` standing for a terminated process.
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }

    /// Wall-clock time of the attempt.
    pub fn duration(&self) -> Duration {
        self.end_time
            .duration_since(self.start_time)
            .unwrap_or_default()
    }
}
