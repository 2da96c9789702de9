// src/exec/attempt.rs

//! A single execution attempt of one command.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::SystemTime;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::types::Outcome;

const READ_CHUNK: usize = 8 * 1024;

/// Everything captured from one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// stdout and stderr interleaved in the order the chunks were read.
    pub combined: Vec<u8>,
    pub outcome: Outcome,
    pub start_time: SystemTime,
    pub end_time: SystemTime,
}

impl AttemptOutput {
    /// An attempt that never got to spawn a process.
    pub fn terminated_before_start() -> Self {
        let now = SystemTime::now();
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            combined: Vec::new(),
            outcome: Outcome::Terminated,
            start_time: now,
            end_time: now,
        }
    }
}

#[derive(Debug, Default)]
struct Capture {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    combined: Vec<u8>,
}

impl Capture {
    fn stdout(&mut self, chunk: &[u8]) {
        self.stdout.extend_from_slice(chunk);
        self.combined.extend_from_slice(chunk);
    }

    fn stderr(&mut self, chunk: &[u8]) {
        self.stderr.extend_from_slice(chunk);
        self.combined.extend_from_slice(chunk);
    }

    fn finish(self, outcome: Outcome, start_time: SystemTime) -> AttemptOutput {
        AttemptOutput {
            stdout: self.stdout,
            stderr: self.stderr,
            combined: self.combined,
            outcome,
            start_time,
            end_time: SystemTime::now(),
        }
    }
}

/// Run `<shell> -c <command>` once.
///
/// Output is buffered until the process exits. If `cancel` fires first, the
/// process is killed and the attempt ends as [`Outcome::Terminated`] with
/// whatever output was read so far. A process that had already exited by
/// then keeps its own exit status.
///
/// An `Err` means the process could not be spawned or awaited; a non-zero
/// exit is a regular `Ok` outcome.
pub async fn run_attempt(
    shell: &Path,
    command: &str,
    cancel: &CancellationToken,
) -> io::Result<AttemptOutput> {
    let start_time = SystemTime::now();

    let mut child = Command::new(shell)
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    debug!(command, pid = ?child.id(), "spawned process");

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout pipe was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr pipe was not captured"))?;

    let mut capture = Capture::default();
    let mut out_buf = [0u8; READ_CHUNK];
    let mut err_buf = [0u8; READ_CHUNK];
    let mut out_open = true;
    let mut err_open = true;
    let mut cancelled = false;

    // Drain both pipes until EOF so a chatty process never blocks on a full
    // pipe, watching for cancellation between reads.
    while out_open || err_open {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            n = stdout.read(&mut out_buf), if out_open => match n? {
                0 => out_open = false,
                n => capture.stdout(&out_buf[..n]),
            },
            n = stderr.read(&mut err_buf), if err_open => match n? {
                0 => err_open = false,
                n => capture.stderr(&err_buf[..n]),
            },
        }
    }

    let outcome = if cancelled {
        terminate(&mut child, command).await
    } else {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => terminate(&mut child, command).await,
            status = child.wait() => Outcome::from_status(status?),
        }
    };

    debug!(command, %outcome, "process finished");
    Ok(capture.finish(outcome, start_time))
}

/// Kill the process unless it has already exited.
///
/// A process that exited before cancellation keeps its real status; anything
/// that had to be killed is reported as terminated, even if the kill failed.
async fn terminate(child: &mut Child, command: &str) -> Outcome {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(command, "process exited before cancellation took effect");
            return Outcome::from_status(status);
        }
        Ok(None) => {}
        Err(e) => warn!(command, error = %e, "could not poll process status"),
    }

    debug!(command, "cancellation requested; killing process");
    if let Err(e) = child.kill().await {
        warn!(command, error = %e, "failed to kill process on cancellation");
    }
    Outcome::Terminated
}
