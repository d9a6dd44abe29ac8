//! Configuration file loading for the Arbor CLI.
//!
//! Configuration is read from TOML: an explicit `--config` path wins,
//! otherwise the platform config directory is checked, and defaults apply
//! when neither exists.

use std::{fs, path::PathBuf};

use directories::ProjectDirs;
use log::debug;

use arbor::{ArborError, config::AppConfig};

/// Load the application configuration.
///
/// # Errors
///
/// Returns an I/O error when an explicitly given file cannot be read, or a
/// configuration error when a file exists but fails to parse.
pub fn load_config(path: Option<&String>) -> Result<AppConfig, ArborError> {
    let path = match path {
        Some(explicit) => Some(PathBuf::from(explicit)),
        None => default_config_path().filter(|candidate| candidate.exists()),
    };

    let Some(path) = path else {
        debug!("No configuration file found, using defaults");
        return Ok(AppConfig::default());
    };

    debug!(config_path:% = path.display(); "Loading configuration");
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content)
        .map_err(|err| ArborError::Config(format!("{}: {err}", path.display())))
}

/// The platform-specific default configuration file location.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "arborworks", "arbor")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
