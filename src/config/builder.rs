// src/config/builder.rs

use crate::config::model::{Config, ExecOption};
use crate::errors::{ConcrunError, Result};

impl Config {
    /// Build a configuration from commands and an ordered list of options.
    ///
    /// Fails on the first invalid option; no command is started either way.
    pub fn build<I, S>(commands: I, options: impl IntoIterator<Item = ExecOption>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cfg = Config {
            commands: commands.into_iter().map(Into::into).collect(),
            ..Config::default()
        };
        for opt in options {
            cfg.apply(opt)?;
        }
        Ok(cfg)
    }

    fn apply(&mut self, opt: ExecOption) -> Result<()> {
        match opt {
            ExecOption::Shell(shell) => self.shell = shell,
            ExecOption::FailFast(fail_fast) => self.fail_fast = fail_fast,
            ExecOption::MaxRetriesPerCommand(n) if n < 0 => {
                return Err(ConcrunError::Config(
                    "max retries per command must be 0 or greater".to_string(),
                ));
            }
            ExecOption::MaxRetriesPerCommand(n) => {
                self.max_retries_per_command = u32::try_from(n).map_err(|_| {
                    ConcrunError::Config(format!(
                        "max retries per command must be at most {}",
                        u32::MAX
                    ))
                })?;
            }
            ExecOption::MaxParallel(0) => {
                return Err(ConcrunError::Config(
                    "max parallel must be 1 or greater".to_string(),
                ));
            }
            ExecOption::MaxParallel(n) => self.max_parallel = Some(n),
        }
        Ok(())
    }
}

/// Fluent front-end over [`Config::build`].
///
/// ```
/// use concrun::config::ConfigBuilder;
///
/// let cfg = ConfigBuilder::new()
///     .command("make lint")
///     .command("make test")
///     .fail_fast(true)
///     .max_retries_per_command(1)
///     .build()
///     .unwrap();
/// assert_eq!(cfg.commands().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    commands: Vec<String>,
    options: Vec<ExecOption>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(mut self, cmd: impl Into<String>) -> Self {
        self.commands.push(cmd.into());
        self
    }

    pub fn commands<I, S>(mut self, cmds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(cmds.into_iter().map(Into::into));
        self
    }

    pub fn option(mut self, opt: ExecOption) -> Self {
        self.options.push(opt);
        self
    }

    pub fn shell(self, shell: impl Into<String>) -> Self {
        self.option(ExecOption::Shell(shell.into()))
    }

    pub fn fail_fast(self, fail_fast: bool) -> Self {
        self.option(ExecOption::FailFast(fail_fast))
    }

    pub fn max_retries_per_command(self, n: i64) -> Self {
        self.option(ExecOption::MaxRetriesPerCommand(n))
    }

    pub fn max_parallel(self, n: usize) -> Self {
        self.option(ExecOption::MaxParallel(n))
    }

    pub fn build(self) -> Result<Config> {
        Config::build(self.commands, self.options)
    }
}
