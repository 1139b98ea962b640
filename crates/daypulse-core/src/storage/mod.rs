mod config;
mod export;

pub use config::Config;
pub use export::{check_range, TaskExport, TaskSource};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/daypulse[-dev]/` based on DAYPULSE_ENV.
///
/// Set DAYPULSE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYPULSE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("daypulse-dev")
    } else {
        base_dir.join("daypulse")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::NoDataDir(e.to_string()))?;
    Ok(dir)
}
