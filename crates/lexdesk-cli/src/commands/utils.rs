use anyhow::{Context, Result};
use chrono::{Local, TimeZone};
use lexdesk_application::{FileSession, start_file_session};
use lexdesk_core::config::LexdeskConfig;
use lexdesk_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Config service for `--config`, or the default location.
pub fn config_service(path: Option<PathBuf>) -> Result<ConfigService> {
    Ok(match path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new()?,
    })
}

/// Installs the stderr logger. `RUST_LOG` wins over the configured level.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the on-disk session described by `config`.
pub async fn open_session(config: &LexdeskConfig) -> Result<FileSession> {
    start_file_session(config)
        .await
        .context("Failed to open LexDesk data")
}

/// Shortens `text` to one line of at most `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max || line.len() < text.trim_end().len() {
        let cut: String = line.chars().take(max).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

/// Formats epoch milliseconds in local time.
pub fn format_millis(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(i64::MAX), "-");
        assert_eq!(format_millis(0).len(), "1970-01-01 00:00".len());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("a long line of text", 6), "a long…");
        assert_eq!(preview("first\nsecond", 20), "first…");
    }

    #[test]
    fn test_config_service_with_path() {
        let service = config_service(Some(PathBuf::from("/tmp/lexdesk.toml"))).unwrap();
        assert_eq!(service.path(), std::path::Path::new("/tmp/lexdesk.toml"));
    }
}
