//! Unified path management for LexDesk files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lexdesk/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/lexdesk/      # Data directory (or `data_dir` from config)
//! ├── local_storage.json       # Key-value entries (autosave, checkpoints)
//! └── stores/
//!     └── <name>.json          # Versioned record store image
//! ```

use lexdesk_core::{LexdeskError, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "lexdesk";

/// Resolves every path the workspace reads or writes.
#[derive(Debug, Clone, Default)]
pub struct LexdeskPaths {
    data_dir_override: Option<PathBuf>,
}

impl LexdeskPaths {
    /// Creates a resolver; `data_dir` replaces the platform data directory.
    pub fn new(data_dir: Option<PathBuf>) -> Self {
        Self {
            data_dir_override: data_dir,
        }
    }

    /// Returns the configuration directory (e.g. `~/.config/lexdesk/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| LexdeskError::config("Cannot find config directory"))
    }

    /// Returns the default path of `config.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the data directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| LexdeskError::config("Cannot find data directory"))
    }

    /// Returns the file holding the key-value entries.
    pub fn key_value_file(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("local_storage.json"))
    }

    /// Returns the file holding the record store named `store_name`.
    pub fn store_file(&self, store_name: &str) -> Result<PathBuf> {
        let file_name = sanitize(store_name);
        if file_name.is_empty() {
            return Err(LexdeskError::config("Store name must not be empty"));
        }
        Ok(self
            .data_dir()?
            .join("stores")
            .join(format!("{}.json", file_name)))
    }

    pub fn data_dir_override(&self) -> Option<&Path> {
        self.data_dir_override.as_deref()
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}
