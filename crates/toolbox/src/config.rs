//! Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toolbox_core::ToolboxConfig;
use toolbox_engine::EngineConfig;

/// Errors from loading an [`AppConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything configurable, as one JSON document. Missing fields take
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub toolbox: ToolboxConfig,
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Parse a JSON config document.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}
