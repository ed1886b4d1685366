//! Loading and writing `config.toml`.

use crate::paths::LexdeskPaths;
use lexdesk_core::config::LexdeskConfig;
use lexdesk_core::{LexdeskError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads the configuration file, falling back to defaults when it is absent.
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the default location (`~/.config/lexdesk/config.toml`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: LexdeskPaths::config_file()?,
        })
    }

    /// Uses a custom path (for the `--config` flag and tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration. A missing file yields the defaults; an
    /// unreadable or invalid one is an error.
    pub fn load(&self) -> Result<LexdeskConfig> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No config file, using defaults");
            return Ok(LexdeskConfig::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            LexdeskError::config(format!("Cannot read {}: {}", self.path.display(), e))
        })?;
        let config = LexdeskConfig::from_toml_str(&content)?;
        tracing::debug!(path = %self.path.display(), "Loaded config");
        Ok(config)
    }

    /// Writes `config`, refusing to overwrite an existing file unless `force`.
    pub fn write(&self, config: &LexdeskConfig, force: bool) -> Result<()> {
        if self.path.exists() && !force {
            return Err(LexdeskError::config(format!(
                "{} already exists",
                self.path.display()
            )));
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, config.to_toml_string()?)?;
        tracing::info!(path = %self.path.display(), "Wrote config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        assert_eq!(service.load().unwrap(), LexdeskConfig::default());
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("nested").join("config.toml"));

        let mut config = LexdeskConfig::default();
        config.autosave.debounce_ms = 750;
        service.write(&config, false).unwrap();

        assert_eq!(service.load().unwrap(), config);
        assert!(service.write(&config, false).is_err());
        service.write(&config, true).unwrap();
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[autosave\n").unwrap();

        let err = ConfigService::with_path(path).load().unwrap_err();
        assert!(matches!(err, LexdeskError::Config(_)));
    }
}
