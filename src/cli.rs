// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `concrun`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "concrun",
    version,
    about = "Run commands concurrently.",
    long_about = None
)]
pub struct CliArgs {
    /// Command to run (repeatable).
    #[arg(short = 'c', long = "command", value_name = "CMD")]
    pub commands: Vec<String>,

    /// Shell used to run each command with `-c`.
    ///
    /// Overrides `shell` from the run file; defaults to `bash`.
    #[arg(short, long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Terminate all other commands once any command fails.
    #[arg(long)]
    pub fail_fast: bool,

    /// Extra attempts for a command that exits non-zero.
    #[arg(short = 'r', long, value_name = "N", allow_negative_numbers = true)]
    pub max_retries: Option<i64>,

    /// Run at most N commands at the same time.
    #[arg(short = 'j', long, value_name = "N")]
    pub max_parallel: Option<usize>,

    /// Optional TOML run file with shell, commands and retry settings.
    ///
    /// `--command` entries are appended after the file's commands.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CONCRUN_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
