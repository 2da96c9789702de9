use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use concrun::exec::{AttemptBackend, AttemptOutput};
use concrun::types::Outcome;
use tokio_util::sync::CancellationToken;

/// One scripted attempt.
#[derive(Debug, Clone)]
pub enum FakeStep {
    /// Exit immediately with this code and no output.
    Exit(i32),
    /// Exit immediately with this code and output.
    Output {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Exit with `code` after `delay`, unless cancelled first.
    ExitAfter(Duration, i32),
    /// Never exit on its own; ends as `Terminated` once cancelled.
    HangUntilCancelled,
    /// Die from a signal on its own, without the run being cancelled.
    Killed,
    /// Cancel the run token, then exit with this code.
    CancelRunThenExit(i32),
    /// Fail to launch.
    LaunchError,
}

/// A scripted backend that never spawns processes.
///
/// - each command plays its script one step per attempt, repeating the last
///   step once the script runs out
/// - unscripted commands exit 0
/// - every attempt is recorded in `calls`
#[derive(Default)]
pub struct FakeBackend {
    scripts: HashMap<String, Vec<FakeStep>>,
    attempts: Mutex<HashMap<String, usize>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, command: &str, steps: impl IntoIterator<Item = FakeStep>) -> Self {
        self.scripts
            .insert(command.to_string(), steps.into_iter().collect());
        self
    }

    /// Shared handle to the recorded attempts, in start order.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    fn next_step(&self, command: &str) -> FakeStep {
        self.calls.lock().unwrap().push(command.to_string());

        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let n = attempts.entry(command.to_string()).or_insert(0);
            let current = *n;
            *n += 1;
            current
        };

        match self.scripts.get(command) {
            Some(steps) if !steps.is_empty() => {
                steps[attempt.min(steps.len() - 1)].clone()
            }
            _ => FakeStep::Exit(0),
        }
    }
}

fn output(outcome: Outcome, stdout: &str, stderr: &str, start_time: SystemTime) -> AttemptOutput {
    let mut combined = stdout.as_bytes().to_vec();
    combined.extend_from_slice(stderr.as_bytes());
    AttemptOutput {
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
        combined,
        outcome,
        start_time,
        end_time: SystemTime::now(),
    }
}

impl AttemptBackend for FakeBackend {
    fn run_attempt<'a>(
        &'a self,
        command: &'a str,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = io::Result<AttemptOutput>> + Send + 'a>> {
        let step = self.next_step(command);

        Box::pin(async move {
            let start = SystemTime::now();
            match step {
                FakeStep::Exit(code) => Ok(output(Outcome::Completed(code), "", "", start)),
                FakeStep::Output {
                    code,
                    stdout,
                    stderr,
                } => Ok(output(Outcome::Completed(code), &stdout, &stderr, start)),
                FakeStep::ExitAfter(delay, code) => {
                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => Outcome::Terminated,
                        _ = tokio::time::sleep(delay) => Outcome::Completed(code),
                    };
                    Ok(output(outcome, "", "", start))
                }
                FakeStep::HangUntilCancelled => {
                    cancel.cancelled().await;
                    Ok(output(Outcome::Terminated, "", "", start))
                }
                FakeStep::Killed => Ok(output(Outcome::Terminated, "", "", start)),
                FakeStep::CancelRunThenExit(code) => {
                    cancel.cancel();
                    Ok(output(Outcome::Completed(code), "", "", start))
                }
                FakeStep::LaunchError => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("scripted launch failure for '{command}'"),
                )),
            }
        })
    }
}
