// src/config/validate.rs

use crate::config::model::{Config, RawConfigFile};
use crate::errors::{ConcrunError, Result};

impl TryFrom<RawConfigFile> for Config {
    type Error = ConcrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let options = raw.options();
        Config::build(raw.commands, options)
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_shell(cfg)?;
    validate_commands(cfg)?;
    Ok(())
}

fn validate_shell(cfg: &RawConfigFile) -> Result<()> {
    if let Some(ref shell) = cfg.shell {
        if shell.trim().is_empty() {
            return Err(ConcrunError::Config(
                "`shell` must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_commands(cfg: &RawConfigFile) -> Result<()> {
    for (index, cmd) in cfg.commands.iter().enumerate() {
        if cmd.trim().is_empty() {
            return Err(ConcrunError::Config(format!(
                "command #{index} in `commands` is empty"
            )));
        }
    }
    Ok(())
}
