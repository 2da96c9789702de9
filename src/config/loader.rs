// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{Config, RawConfigFile};
use crate::errors::Result;

/// Load a run file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate the
/// values. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawConfigFile = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load a run file and turn it into a validated [`Config`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw = load_from_path(&path)?;
    Config::try_from(raw)
}
