// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::errors::{ConcrunError, Result};
use crate::exec::{AttemptBackend, ShellBackend};

use super::core::CommandState;
use super::result::ExecResult;
use super::worker::Worker;

/// Default capacity of the result channel between workers and a consumer.
pub const RESULT_CHANNEL_CAPACITY: usize = 64;

/// Runs every configured command concurrently.
///
/// [`Executor::run`] is the streaming API; [`Executor::collect`] and
/// [`Executor::run_blocking`] gather the whole stream for callers that only
/// care about the final picture.
#[derive(Clone)]
pub struct Executor {
    config: Arc<Config>,
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("commands", &self.config.commands().len())
            .field("shell", &self.config.shell())
            .finish_non_exhaustive()
    }
}

/// Everything a run produced, in completion order.
#[derive(Debug)]
pub struct RunReport {
    pub results: Vec<ExecResult>,
    /// Run-level error: shell resolution failure or the first launch error.
    pub error: Option<ConcrunError>,
}

impl Executor {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stream results and errors for one run.
    ///
    /// - Resolves the shell first; on failure the error is sent and nothing
    ///   is executed.
    /// - Otherwise every command gets its own worker on a child of `parent`,
    ///   so cancelling `parent` terminates the whole run.
    ///
    /// Both sinks are closed (dropped) when this returns, on every path.
    pub async fn run(
        &self,
        parent: &CancellationToken,
        results: mpsc::Sender<ExecResult>,
        errors: mpsc::Sender<ConcrunError>,
    ) {
        let backend = match ShellBackend::resolve(self.config.shell()) {
            Ok(backend) => backend,
            Err(err) => {
                error!(shell = %self.config.shell(), error = %err, "shell resolution failed");
                let _ = errors.send(err).await;
                return;
            }
        };

        orchestrate(&self.config, Arc::new(backend), parent, results, errors).await;
    }

    /// Run to completion and gather the full stream.
    pub async fn collect(&self, parent: &CancellationToken) -> RunReport {
        let (result_tx, mut result_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
        let (error_tx, mut error_rx) = mpsc::channel(1);

        let gather = async {
            let mut results = Vec::new();
            while let Some(result) = result_rx.recv().await {
                results.push(result);
            }
            results
        };

        let ((), results) = tokio::join!(self.run(parent, result_tx, error_tx), gather);
        let error = error_rx.recv().await;

        RunReport { results, error }
    }

    /// Blocking convenience wrapper around [`Executor::collect`].
    ///
    /// Builds its own Tokio runtime, so it must not be called from within
    /// an async context.
    pub fn run_blocking(&self) -> Result<RunReport> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(rt.block_on(self.collect(&CancellationToken::new())))
    }
}

/// Launch one worker per command against `backend` and wait for all of them.
///
/// Only the first worker error is forwarded on `errors`, after every worker
/// has reached a terminal state; later errors are logged and dropped.
pub async fn orchestrate(
    config: &Config,
    backend: Arc<dyn AttemptBackend>,
    parent: &CancellationToken,
    results: mpsc::Sender<ExecResult>,
    errors: mpsc::Sender<ConcrunError>,
) {
    let run_token = parent.child_token();
    let limiter = config.max_parallel().map(|n| Arc::new(Semaphore::new(n)));

    info!(
        commands = config.commands().len(),
        fail_fast = config.fail_fast(),
        max_retries = config.max_retries_per_command(),
        max_parallel = ?config.max_parallel(),
        "starting run"
    );

    let mut workers = JoinSet::new();
    for (index, command) in config.commands().iter().enumerate() {
        let worker = Worker::new(
            CommandState::new(index, command.clone(), config.max_retries_per_command()),
            config.fail_fast(),
            Arc::clone(&backend),
            run_token.clone(),
            results.clone(),
        );
        let limiter = limiter.clone();

        workers.spawn(async move {
            let _permit = match limiter {
                Some(sem) => match sem.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(e) => return Err(ConcrunError::Worker(e.to_string())),
                },
                None => None,
            };
            worker.run().await
        });
    }
    // Workers hold the remaining senders; the stream closes with the last one.
    drop(results);

    let mut first_error: Option<ConcrunError> = None;
    while let Some(joined) = workers.join_next().await {
        let outcome = joined
            .map_err(|e| ConcrunError::Worker(e.to_string()))
            .and_then(|res| res);

        match outcome {
            Ok(terminal) => debug!(?terminal, "worker finished"),
            Err(err) if first_error.is_none() => first_error = Some(err),
            Err(err) => debug!(error = %err, "dropping subsequent worker error"),
        }
    }

    info!(failed = first_error.is_some(), "run finished");

    if let Some(err) = first_error {
        let _ = errors.send(err).await;
    }
}
