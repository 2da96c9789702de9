use std::fmt;
use std::process::ExitStatus;

/// Exit code reported for a process that did not finish on its own.
///
/// Real processes only ever report codes in `0..=255`, so this value can never
/// collide with a genuine exit status.
pub const TERMINATED_EXIT_CODE: i32 = -1;

/// How a single attempt of a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The process exited normally with this code.
    Completed(i32),
    /// The process was killed (cancellation or an external signal) before it
    /// could exit on its own.
    Terminated,
}

impl Outcome {
    /// Map a process exit status onto an outcome.
    ///
    /// On Unix a status without a code means the process died from a signal.
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => Outcome::Completed(code),
            None => Outcome::Terminated,
        }
    }

    /// Numeric exit code, with [`TERMINATED_EXIT_CODE`] for `Terminated`.
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Completed(code) => code,
            Outcome::Terminated => TERMINATED_EXIT_CODE,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Completed(0))
    }

    pub fn is_terminated(self) -> bool {
        matches!(self, Outcome::Terminated)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Completed(code) => write!(f, "exited with {code}"),
            Outcome::Terminated => f.write_str("terminated"),
        }
    }
}
