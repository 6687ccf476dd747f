//! Configuration module
//!
//! Settings are read from a TOML file; every section and key is optional.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "json"
//!
//! [patch]
//! allow_downgrades = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::support::errors::InfraError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub patch: PatchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

/// Policy for merge-patches applied through a shared handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Accept a `last_updated` that does not move forward.
    pub allow_downgrades: bool,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, InfraError> {
        Ok(toml::from_str(text)?)
    }
}

/// `<config dir>/ocpi-bindings/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("ocpi-bindings"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}
