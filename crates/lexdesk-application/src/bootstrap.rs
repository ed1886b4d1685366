//! Wiring of a file-backed session from configuration.

use crate::scheduler::TokioScheduler;
use crate::session::AppSession;
use lexdesk_core::Result;
use lexdesk_core::config::LexdeskConfig;
use lexdesk_infrastructure::{FileKeyValueStorage, JsonFileEngine, LexdeskPaths, VersionedStore};
use std::sync::Arc;
use tracing::debug;

/// Session whose state and records live under the data directory.
pub type FileSession = AppSession<VersionedStore<JsonFileEngine>>;

/// Opens the on-disk store and key-value file named by `config`.
pub async fn start_file_session(config: &LexdeskConfig) -> Result<FileSession> {
    config.validate()?;
    let paths = LexdeskPaths::new(config.data_dir.clone());

    let store_file = paths.store_file(&config.store.name)?;
    let key_value_file = paths.key_value_file()?;
    debug!(
        store = %store_file.display(),
        key_value = %key_value_file.display(),
        "Starting file-backed session"
    );

    let store = Arc::new(VersionedStore::new(
        config.store.name.clone(),
        config.store.version,
        JsonFileEngine::new(store_file),
    ));
    let storage = Arc::new(FileKeyValueStorage::new(key_value_file));

    AppSession::start(store, storage, Arc::new(TokioScheduler), &config.autosave).await
}
