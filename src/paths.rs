//! Runtime file locations.
//!
//! Everything lives under one base directory, `~/.stayontask` unless the
//! `STAYONTASK_HOME` environment variable points elsewhere.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "STAYONTASK_HOME";

/// Base directory name under the user's home.
const BASE_DIR_NAME: &str = ".stayontask";

const SOCKET_FILE: &str = "stayontask.sock";
const SETTINGS_FILE: &str = "settings.json";
const TASKS_FILE: &str = "todos.json";

/// Returns the base directory for sockets and data files.
///
/// # Errors
///
/// Returns an error if no override is set and the home directory is unknown.
pub fn base_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir().context("Failed to determine home directory")?;
    Ok(home.join(BASE_DIR_NAME))
}

/// Returns the daemon's IPC socket path.
pub fn socket_path() -> Result<PathBuf> {
    Ok(base_dir()?.join(SOCKET_FILE))
}

/// Returns the persisted settings file.
pub fn settings_path() -> Result<PathBuf> {
    Ok(base_dir()?.join(SETTINGS_FILE))
}

/// Returns the persisted task list.
pub fn tasks_path() -> Result<PathBuf> {
    Ok(base_dir()?.join(TASKS_FILE))
}
