// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Ordinary command failure is *not* an error: a command that exits non-zero
//! or is terminated shows up as an [`ExecResult`](crate::engine::ExecResult)
//! with the corresponding outcome. The variants below are reserved for
//! conditions that stop a run (or a single worker) from doing its job.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcrunError {
    /// Invalid run configuration; raised before anything is executed.
    #[error("{0}")]
    Config(String),

    /// The configured shell could not be located.
    #[error("cannot resolve shell '{shell}': {reason}")]
    ShellResolution { shell: String, reason: String },

    /// A command's process could not be started or awaited.
    #[error("failed to launch command #{index} '{command}': {source}")]
    Launch {
        index: usize,
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// A worker task died without reaching a terminal state.
    #[error("worker failed: {0}")]
    Worker(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ConcrunError>;
