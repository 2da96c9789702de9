// src/engine/core.rs

//! Pure per-command retry state machine.
//!
//! [`CommandState`] tracks one command across its attempts. The async worker
//! feeds it the outcome of every attempt through [`CommandState::step`] and
//! acts on the returned [`Transition`]. There are no channels, processes or
//! Tokio types in here, so every transition can be tested synchronously.

use crate::types::Outcome;

/// Terminal state of a command's retry loop.
///
/// None of these are errors; a launch failure is reported separately by the
/// worker as an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// An attempt exited with code 0.
    Success,
    /// The last allowed attempt exited non-zero.
    RetryExhausted,
    /// The run was cancelled; no further attempts will be made.
    Cancelled,
}

/// What the worker should do after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Run another attempt immediately.
    Retry,
    Stop(Terminal),
}

#[derive(Debug, Clone)]
pub struct CommandState {
    index: usize,
    command: String,
    max_retries: u32,
    /// Attempts made before the current one.
    retries: u32,
    last_outcome: Option<Outcome>,
    terminal: Option<Terminal>,
}

impl CommandState {
    pub fn new(index: usize, command: impl Into<String>, max_retries: u32) -> Self {
        Self {
            index,
            command: command.into(),
            max_retries,
            retries: 0,
            last_outcome: None,
            terminal: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Retry count to stamp on the attempt that is about to run.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    /// True when the last recorded attempt did not exit with 0.
    pub fn failed(&self) -> bool {
        self.last_outcome.is_some_and(|o| !o.is_success())
    }

    /// Record the outcome of the current attempt.
    ///
    /// `cancelled` is whether the run had been cancelled by the time the
    /// outcome was observed. A cancelled run never retries, whatever budget
    /// is left.
    pub fn step(&mut self, outcome: Outcome, cancelled: bool) -> Transition {
        debug_assert!(!self.is_finished(), "step called on a finished command");

        self.last_outcome = Some(outcome);

        let transition = if outcome.is_success() {
            Transition::Stop(Terminal::Success)
        } else if cancelled {
            Transition::Stop(Terminal::Cancelled)
        } else if self.retries >= self.max_retries {
            Transition::Stop(Terminal::RetryExhausted)
        } else {
            self.retries += 1;
            Transition::Retry
        };

        if let Transition::Stop(terminal) = transition {
            self.terminal = Some(terminal);
        }
        transition
    }

    /// True once at least one attempt outcome has been recorded.
    pub fn has_attempted(&self) -> bool {
        self.last_outcome.is_some()
    }

    /// The run was cancelled before the next attempt could start.
    ///
    /// Before the first attempt this records `Terminated`; afterwards the
    /// last observed outcome stays the command's final one.
    pub fn cancel_before_attempt(&mut self) -> Terminal {
        if self.last_outcome.is_none() {
            self.last_outcome = Some(Outcome::Terminated);
        }
        self.terminal = Some(Terminal::Cancelled);
        Terminal::Cancelled
    }
}
