// src/config/model.rs

use serde::Deserialize;

/// Shell used when none is configured.
pub const DEFAULT_SHELL: &str = "bash";

/// Validated, immutable parameters for one run.
///
/// Construct it through [`Config::build`], [`ConfigBuilder`](super::ConfigBuilder)
/// or from a TOML file via [`load_and_validate`](super::load_and_validate);
/// all of them reject invalid values before anything is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) commands: Vec<String>,
    pub(crate) shell: String,
    pub(crate) fail_fast: bool,
    pub(crate) max_retries_per_command: u32,
    pub(crate) max_parallel: Option<usize>,
}

impl Config {
    /// Commands in declaration order. The position is the command's index in
    /// every [`ExecResult`](crate::engine::ExecResult) it produces.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn max_retries_per_command(&self) -> u32 {
        self.max_retries_per_command
    }

    /// Upper bound on simultaneously running commands; `None` = unbounded.
    pub fn max_parallel(&self) -> Option<usize> {
        self.max_parallel
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            shell: DEFAULT_SHELL.to_string(),
            fail_fast: false,
            max_retries_per_command: 0,
            max_parallel: None,
        }
    }
}

/// A single configuration option.
///
/// Options are applied in the order given; when the same option appears more
/// than once the last value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOption {
    /// Shell executable used to run each command with `-c`.
    Shell(String),
    /// Cancel all sibling commands once any command ends non-zero.
    FailFast(bool),
    /// Extra attempts allowed after a non-zero exit. Must be `>= 0`.
    MaxRetriesPerCommand(i64),
    /// Cap on concurrently running commands. Must be `>= 1`.
    MaxParallel(usize),
}

/// Shape of an optional TOML run file.
///
/// ```toml
/// shell = "bash"
/// fail_fast = true
/// max_retries_per_command = 2
/// max_parallel = 4
/// commands = ["make lint", "make test"]
/// ```
///
/// Every key is optional. This type is not validated; convert it with
/// `Config::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub commands: Vec<String>,

    #[serde(default)]
    pub shell: Option<String>,

    #[serde(default)]
    pub fail_fast: Option<bool>,

    /// Signed so that a negative value in the file is reported as a
    /// configuration error rather than a TOML type error.
    #[serde(default)]
    pub max_retries_per_command: Option<i64>,

    #[serde(default)]
    pub max_parallel: Option<usize>,
}

impl RawConfigFile {
    /// Options in a fixed order, suitable for [`Config::build`].
    pub fn options(&self) -> Vec<ExecOption> {
        let mut opts = Vec::new();
        if let Some(ref shell) = self.shell {
            opts.push(ExecOption::Shell(shell.clone()));
        }
        if let Some(fail_fast) = self.fail_fast {
            opts.push(ExecOption::FailFast(fail_fast));
        }
        if let Some(n) = self.max_retries_per_command {
            opts.push(ExecOption::MaxRetriesPerCommand(n));
        }
        if let Some(n) = self.max_parallel {
            opts.push(ExecOption::MaxParallel(n));
        }
        opts
    }
}
