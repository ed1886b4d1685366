//! Named, user-created snapshots of the whole application state.

use chrono::{Local, TimeZone};
use lexdesk_core::checkpoint::{Checkpoint, CheckpointSummary};
use lexdesk_core::storage::{CHECKPOINTS_KEY, KeyValueStorage};
use lexdesk_core::{LexdeskError, Result, now_millis};
use serde_json::Value as JsonValue;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Keeps the checkpoint list in memory and mirrors it to one key-value entry.
///
/// The list is ordered most-recent-first. Every mutation persists the full
/// list before it becomes visible in memory, so a failed write leaves both
/// copies as they were.
pub struct CheckpointManager {
    storage: Arc<dyn KeyValueStorage>,
    checkpoints: RwLock<Vec<Checkpoint>>,
}

impl CheckpointManager {
    /// Loads the persisted list.
    ///
    /// Missing or unparsable values start an empty list.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let checkpoints = match storage.get(CHECKPOINTS_KEY)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Checkpoint>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable checkpoint list");
                    Vec::new()
                }
            },
        };
        debug!(count = checkpoints.len(), "Loaded checkpoints");

        Ok(Self {
            storage,
            checkpoints: RwLock::new(checkpoints),
        })
    }

    /// Creates a checkpoint of `state` at the head of the list.
    ///
    /// A blank name is replaced by one derived from the creation time.
    pub fn create(&self, name: &str, state: JsonValue) -> Result<CheckpointSummary> {
        let timestamp = now_millis();
        let name = match name.trim() {
            "" => default_name(timestamp),
            trimmed => trimmed.to_string(),
        };
        let checkpoint = Checkpoint {
            id: Uuid::new_v4().to_string(),
            timestamp,
            name,
            state,
        };
        let summary = checkpoint.summary();

        let mut checkpoints = self.write_guard();
        let mut next = Vec::with_capacity(checkpoints.len() + 1);
        next.push(checkpoint);
        next.extend(checkpoints.iter().cloned());

        self.persist(&next)?;
        *checkpoints = next;

        info!(id = %summary.id, name = %summary.name, "Created checkpoint");
        Ok(summary)
    }

    /// Returns the state stored in checkpoint `id`.
    pub fn restore(&self, id: &str) -> Result<JsonValue> {
        self.read_guard()
            .iter()
            .find(|checkpoint| checkpoint.id == id)
            .map(|checkpoint| checkpoint.state.clone())
            .ok_or_else(|| LexdeskError::not_found("checkpoint", id))
    }

    /// Removes checkpoint `id`. Deleting an unknown id does nothing.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut checkpoints = self.write_guard();
        if !checkpoints.iter().any(|checkpoint| checkpoint.id == id) {
            debug!(id, "Checkpoint already absent");
            return Ok(());
        }

        let next: Vec<Checkpoint> = checkpoints
            .iter()
            .filter(|checkpoint| checkpoint.id != id)
            .cloned()
            .collect();

        self.persist(&next)?;
        *checkpoints = next;

        info!(id, "Deleted checkpoint");
        Ok(())
    }

    /// Metadata of every checkpoint, most recent first.
    pub fn list(&self) -> Vec<CheckpointSummary> {
        self.read_guard().iter().map(Checkpoint::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    fn persist(&self, checkpoints: &[Checkpoint]) -> Result<()> {
        let json = serde_json::to_string(checkpoints)?;
        self.storage.set(CHECKPOINTS_KEY, &json)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Vec<Checkpoint>> {
        self.checkpoints
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<Checkpoint>> {
        self.checkpoints
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn default_name(timestamp: i64) -> String {
    match Local.timestamp_millis_opt(timestamp).single() {
        Some(time) => format!("Checkpoint {}", time.format("%Y-%m-%d %H:%M")),
        None => "Checkpoint".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_infrastructure::MemoryKeyValueStorage;
    use serde_json::json;

    fn manager() -> (Arc<MemoryKeyValueStorage>, CheckpointManager) {
        let storage = Arc::new(MemoryKeyValueStorage::new());
        let manager = CheckpointManager::load(storage.clone()).unwrap();
        (storage, manager)
    }

    #[test]
    fn test_create_prepends_and_persists() {
        let (storage, manager) = manager();

        let first = manager.create("First", json!({ "n": 1 })).unwrap();
        let second = manager.create("Second", json!({ "n": 2 })).unwrap();
        assert_ne!(first.id, second.id);

        let names: Vec<_> = manager.list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Second", "First"]);

        let reloaded = CheckpointManager::load(storage).unwrap();
        assert_eq!(reloaded.list(), manager.list());
    }

    #[test]
    fn test_restore_returns_stored_state() {
        let (_, manager) = manager();
        let state = json!({ "report": { "title": "Lease dispute" } });
        let summary = manager.create("Lease", state.clone()).unwrap();

        assert_eq!(manager.restore(&summary.id).unwrap(), state);
    }

    #[test]
    fn test_restore_unknown_id_is_not_found() {
        let (_, manager) = manager();
        let err = manager.restore("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Checkpoint no longer exists");
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let (storage, manager) = manager();
        manager.create("Only", json!({})).unwrap();
        let writes = storage.write_count();

        manager.delete("missing").unwrap();
        assert_eq!(manager.len(), 1);
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let (storage, manager) = manager();
        let keep = manager.create("Keep", json!({})).unwrap();
        let dropped = manager.create("Drop", json!({})).unwrap();

        manager.delete(&dropped.id).unwrap();
        let reloaded = CheckpointManager::load(storage).unwrap();
        assert_eq!(reloaded.list(), vec![keep]);
    }

    #[test]
    fn test_failed_create_leaves_list_unchanged() {
        let (storage, manager) = manager();
        manager.create("Existing", json!({})).unwrap();
        storage.set_fail_writes(true);

        let err = manager.create("Lost", json!({})).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.list()[0].name, "Existing");
    }

    #[test]
    fn test_corrupt_list_loads_empty() {
        let storage = Arc::new(MemoryKeyValueStorage::new());
        storage.set(CHECKPOINTS_KEY, "[{ broken").unwrap();

        let manager = CheckpointManager::load(storage).unwrap();
        assert!(manager.is_empty());
    }

    #[test]
    fn test_blank_name_gets_default() {
        let (_, manager) = manager();
        let summary = manager.create("   ", json!({})).unwrap();
        assert!(summary.name.starts_with("Checkpoint"));
    }
}
