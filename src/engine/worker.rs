// src/engine/worker.rs

//! Async worker: one per command.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::engine::core::{CommandState, Terminal, Transition};
use crate::engine::result::ExecResult;
use crate::errors::{ConcrunError, Result};
use crate::exec::{AttemptBackend, AttemptOutput};

/// Drives one command's [`CommandState`] against an [`AttemptBackend`].
///
/// Every attempt's result is pushed to `results` as soon as the attempt ends.
/// A launch failure ends the worker with `Err` and produces no result for
/// that attempt.
pub struct Worker {
    state: CommandState,
    fail_fast: bool,
    backend: Arc<dyn AttemptBackend>,
    cancel: CancellationToken,
    results: mpsc::Sender<ExecResult>,
}

impl Worker {
    pub fn new(
        state: CommandState,
        fail_fast: bool,
        backend: Arc<dyn AttemptBackend>,
        cancel: CancellationToken,
        results: mpsc::Sender<ExecResult>,
    ) -> Self {
        Self {
            state,
            fail_fast,
            backend,
            cancel,
            results,
        }
    }

    /// Run the retry loop to a terminal state, then apply fail-fast.
    pub async fn run(mut self) -> Result<Terminal> {
        let outcome = self.drive().await;

        if self.fail_fast && self.state.failed() {
            if !self.cancel.is_cancelled() {
                warn!(
                    index = self.state.index(),
                    command = %self.state.command(),
                    last_outcome = ?self.state.last_outcome(),
                    "command failed with fail-fast enabled; cancelling remaining commands"
                );
            }
            // Idempotent: later failures find the token already cancelled.
            self.cancel.cancel();
        }

        outcome
    }

    async fn drive(&mut self) -> Result<Terminal> {
        let index = self.state.index();

        loop {
            let retries = self.state.retries();

            if self.cancel.is_cancelled() {
                debug!(index, command = %self.state.command(), retries, "run cancelled before attempt");
                // A retry that never ran gets no result; the last one stands.
                let first_attempt = !self.state.has_attempted();
                let terminal = self.state.cancel_before_attempt();
                if first_attempt {
                    self.emit(ExecResult::from_attempt(
                        index,
                        self.state.command().to_string(),
                        retries,
                        AttemptOutput::terminated_before_start(),
                    ))
                    .await;
                }
                return Ok(terminal);
            }

            debug!(index, command = %self.state.command(), retries, "starting attempt");

            let output = self
                .backend
                .run_attempt(self.state.command(), &self.cancel)
                .await
                .map_err(|source| {
                    error!(
                        index,
                        command = %self.state.command(),
                        error = %source,
                        "command could not be launched"
                    );
                    ConcrunError::Launch {
                        index,
                        command: self.state.command().to_string(),
                        source,
                    }
                })?;

            let result =
                ExecResult::from_attempt(index, self.state.command().to_string(), retries, output);
            let exit_code = result.exit_code();
            let transition = self.state.step(result.outcome, self.cancel.is_cancelled());
            self.emit(result).await;

            match transition {
                Transition::Retry => {
                    debug!(index, command = %self.state.command(), exit_code, retries, "attempt failed; retrying");
                }
                Transition::Stop(terminal) => {
                    info!(
                        index,
                        command = %self.state.command(),
                        exit_code,
                        retries,
                        ?terminal,
                        "command finished"
                    );
                    return Ok(terminal);
                }
            }
        }
    }

    async fn emit(&self, result: ExecResult) {
        if self.results.send(result).await.is_err() {
            debug!(index = self.state.index(), "result receiver dropped; discarding result");
        }
    }
}
