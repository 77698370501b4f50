mod config;

pub use config::{Config, DrillSettings, ScoringConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/safedrill[-dev]/` based on SAFEDRILL_ENV.
///
/// Set SAFEDRILL_ENV=dev to use the development data directory, or
/// SAFEDRILL_HOME to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SAFEDRILL_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SAFEDRILL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("safedrill-dev")
            } else {
                base_dir.join("safedrill")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
