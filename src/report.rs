// src/report.rs

//! Result consumer: terminal printing and the aggregate run status.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::engine::ExecResult;

const COMMAND_POINTER: &str = "▶";
const SEPARATOR: &str = "--------------------------------------------------";

/// Exit code reported when a command was terminated and nothing exited with
/// a higher code (128 + SIGKILL).
pub const TERMINATED_PROCESS_EXIT_CODE: i32 = 137;

/// Aggregate status of a finished run, computed from final results only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    /// Highest non-zero exit code among final results.
    Failed(i32),
    /// At least one command was terminated before finishing on its own.
    /// Reported as such even when another command exited with a real code.
    Terminated { highest_exit_code: i32 },
}

impl RunStatus {
    pub fn from_final_results<'a>(finals: impl IntoIterator<Item = &'a ExecResult>) -> Self {
        let mut highest = 0;
        let mut terminated = false;
        for r in finals {
            if r.outcome.is_terminated() {
                terminated = true;
            }
            highest = highest.max(r.exit_code());
        }

        match (terminated, highest) {
            (true, _) => RunStatus::Terminated {
                highest_exit_code: highest,
            },
            (false, 0) => RunStatus::Success,
            (false, code) => RunStatus::Failed(code),
        }
    }

    /// Process exit code for the CLI: the highest positive final exit code,
    /// else 137 when a command was terminated, else 0.
    pub fn process_exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Failed(code) => code,
            RunStatus::Terminated { highest_exit_code } if highest_exit_code > 0 => {
                highest_exit_code
            }
            RunStatus::Terminated { .. } => TERMINATED_PROCESS_EXIT_CODE,
        }
    }
}

/// Keep the last result of every command, ordered by command index.
pub fn final_results(results: &[ExecResult]) -> Vec<&ExecResult> {
    let mut finals: BTreeMap<usize, &ExecResult> = BTreeMap::new();
    for r in results {
        match finals.get(&r.index) {
            Some(prev) if prev.retries > r.retries => {}
            _ => {
                finals.insert(r.index, r);
            }
        }
    }
    finals.into_values().collect()
}

/// Print one attempt: header, combined output, footer.
pub fn print_result(out: &mut impl Write, result: &ExecResult) -> io::Result<()> {
    writeln!(out, "{SEPARATOR}")?;
    writeln!(out, "{COMMAND_POINTER} {}", result.command)?;
    out.write_all(&result.combined)?;
    if result.outcome.is_terminated() {
        writeln!(out, "(command was terminated by signal)")?;
    }

    let retry = if result.retries > 0 {
        format!(", retry: {}", result.retries)
    } else {
        String::new()
    };
    writeln!(
        out,
        "---- [ exit code: {}, execution time: {:?}{retry} ]",
        result.exit_code(),
        result.duration()
    )?;
    out.flush()
}
