//! Mode marker management.
//!
//! `init` and `init-here` write `.credmatch.toml` next to the store so later
//! commands read the mode back instead of guessing it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::core::store::{self, StoreMode};
use crate::error::{ConfigError, Result};

/// Contents of `.credmatch.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tool metadata
    pub credmatch: Meta,
    /// Store location
    pub store: StoreConfig,
}

/// Metadata section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Version of credmatch that wrote the marker
    pub version: String,
}

/// Store section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Dedicated subdirectory or current directory
    pub mode: StoreMode,
    /// Remote the dedicated store was cloned from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl Config {
    /// Create a marker for `mode`.
    pub fn new(mode: StoreMode, remote: Option<String>) -> Self {
        Self {
            credmatch: Meta {
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            store: StoreConfig { mode, remote },
        }
    }

    /// Path of the marker under `base`.
    pub fn path(base: &Path) -> PathBuf {
        base.join(constants::CONFIG_FILE)
    }

    /// Whether a marker exists under `base`.
    pub fn exists(base: &Path) -> bool {
        Self::path(base).exists()
    }

    /// Load the marker from `base`.
    ///
    /// # Returns
    ///
    /// `None` if there is no marker.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed or validated.
    pub fn load(base: &Path) -> Result<Option<Self>> {
        let path = Self::path(base);
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        debug!(mode = %config.store.mode, "config loaded");
        Ok(Some(config))
    }

    /// Save the marker under `base`.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or the write fails.
    pub fn save(&self, base: &Path) -> Result<()> {
        debug!("saving config");
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        store::write_atomic(&Self::path(base), contents.as_bytes())
    }

    /// Validate the marker contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on an empty version or a remote on
    /// a current-directory store.
    pub fn validate(&self) -> Result<()> {
        if self.credmatch.version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "version",
                reason: "empty".to_string(),
            }
            .into());
        }
        if self.store.mode == StoreMode::CurrentDirectory && self.store.remote.is_some() {
            return Err(ConfigError::InvalidValue {
                field: "remote",
                reason: "only dedicated stores record a remote".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
