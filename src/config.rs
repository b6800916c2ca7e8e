use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "airc-extract";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn default_log_filter() -> String {
    "info".to_string()
}

/// Get the application data directory (~/.airc_extract)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".airc_extract")
}

/// Default location of the configuration file
pub fn default_config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Default location of the output measurement database
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("airc.db")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0} (run `airc-extract init` to create it)")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Persistent tool configuration, stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output SQLite database holding the normalized measurements
    pub data_db: PathBuf,
    /// Root directory whose subdirectories are per-series report folders
    pub dicom_root: PathBuf,
    /// Default tracing filter (overridable via RUST_LOG)
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Where per-series JSON exports go when --save-json is passed
    #[serde(default)]
    pub json_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(dicom_root: PathBuf, data_db: Option<PathBuf>) -> Self {
        Self {
            data_db: data_db.unwrap_or_else(default_db_path),
            dicom_root,
            log_filter: default_log_filter(),
            json_dir: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
