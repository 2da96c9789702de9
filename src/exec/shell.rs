// src/exec/shell.rs

//! Shell resolution.
//!
//! The configured shell name is resolved to an executable path once per run,
//! before any command is spawned.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{ConcrunError, Result};

/// Resolve `shell` against the current `PATH`.
pub fn resolve_shell(shell: &str) -> Result<PathBuf> {
    let search_paths = std::env::var_os("PATH").unwrap_or_default();
    resolve_shell_in(shell, &search_paths)
}

/// Resolve `shell` against an explicit search path list.
///
/// - empty name: error.
/// - absolute path, or a relative path with more than one component
///   (`bin/sh`, `./sh`): used as-is if it is an executable file.
/// - bare name: the first executable match in `search_paths` wins.
pub fn resolve_shell_in(shell: &str, search_paths: &OsStr) -> Result<PathBuf> {
    let not_found = |reason: &str| ConcrunError::ShellResolution {
        shell: shell.to_string(),
        reason: reason.to_string(),
    };

    if shell.is_empty() {
        return Err(not_found("empty shell name"));
    }

    let path = Path::new(shell);
    if path.components().count() > 1 || path.is_absolute() {
        return if is_executable(path) {
            Ok(path.to_path_buf())
        } else {
            Err(not_found("no such executable file"))
        };
    }

    let found = std::env::split_paths(search_paths)
        .map(|dir| dir.join(path))
        .find(|candidate| is_executable(candidate));

    match found {
        Some(resolved) => {
            debug!(shell, resolved = %resolved.display(), "resolved shell");
            Ok(resolved)
        }
        None => Err(not_found("executable file not found in $PATH")),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
