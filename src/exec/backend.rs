// src/exec/backend.rs

//! Pluggable attempt backend.
//!
//! Workers never spawn processes directly; they ask an [`AttemptBackend`] to
//! run one attempt of a command. Production uses [`ShellBackend`], tests can
//! script outcomes without touching the OS.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;

use super::attempt::{AttemptOutput, run_attempt};
use super::shell::resolve_shell;

/// Runs a single attempt of a command.
pub trait AttemptBackend: Send + Sync {
    /// Execute `command` once.
    ///
    /// Implementations must return promptly with [`Outcome::Terminated`]
    /// once `cancel` fires, and return `Err` only when the attempt could not
    /// be started or awaited.
    ///
    /// [`Outcome::Terminated`]: crate::types::Outcome::Terminated
    fn run_attempt<'a>(
        &'a self,
        command: &'a str,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = io::Result<AttemptOutput>> + Send + 'a>>;
}

/// Real backend: runs commands through a resolved shell with `-c`.
#[derive(Debug, Clone)]
pub struct ShellBackend {
    shell: PathBuf,
}

impl ShellBackend {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self { shell: shell.into() }
    }

    /// Resolve `shell` on `PATH` and build a backend for it.
    pub fn resolve(shell: &str) -> Result<Self> {
        resolve_shell(shell).map(Self::new)
    }

    pub fn shell(&self) -> &Path {
        &self.shell
    }
}

impl AttemptBackend for ShellBackend {
    fn run_attempt<'a>(
        &'a self,
        command: &'a str,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = io::Result<AttemptOutput>> + Send + 'a>> {
        Box::pin(run_attempt(&self.shell, command, cancel))
    }
}
