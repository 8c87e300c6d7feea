//! Path Utilities
//!
//! Common path resolution for graphcell directories and files.

use std::path::PathBuf;

use super::error::ConfigError;

/// Get the graphcell base directory (`~/.graphcell/`)
pub fn graphcell_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(|| ConfigError::File {
        path: "~".to_string(),
        message: "could not determine home directory".to_string(),
    })?;
    Ok(home.join(".graphcell"))
}

/// Get the default config file path (`~/.graphcell/config.json`)
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(graphcell_dir()?.join("config.json"))
}
