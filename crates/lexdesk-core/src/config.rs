//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! field is optional in the file; missing values fall back to the defaults
//! below.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Name of the record store database.
pub const DEFAULT_STORE_NAME: &str = "lexdesk";

/// Schema version the current build expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LexdeskConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub autosave: AutosaveConfig,
    pub store: StoreConfig,
}

impl Default for LexdeskConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "info".to_string(),
            autosave: AutosaveConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before the snapshot is written.
    pub debounce_ms: u64,
    /// How long the "saved" indicator stays up.
    pub saved_display_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1500,
            saved_display_ms: 2000,
        }
    }
}

impl AutosaveConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn saved_display(&self) -> Duration {
        Duration::from_millis(self.saved_display_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub name: String,
    pub version: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STORE_NAME.to_string(),
            version: CURRENT_SCHEMA_VERSION,
        }
    }
}

impl LexdeskConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LexdeskConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.name.trim().is_empty() {
            return Err(crate::LexdeskError::config("store.name must not be empty"));
        }
        if self.store.version == 0 {
            return Err(crate::LexdeskError::config("store.version must be at least 1"));
        }
        if self.store.version > CURRENT_SCHEMA_VERSION {
            return Err(crate::LexdeskError::config(format!(
                "store.version {} is newer than the supported schema version {}",
                self.store.version, CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}
