//! In-memory key-value storage.

use lexdesk_core::storage::KeyValueStorage;
use lexdesk_core::{LexdeskError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Process-local storage, mainly for tests and ephemeral sessions.
///
/// Writes can be made to fail on demand to exercise quota handling, and
/// every successful `set` is counted.
#[derive(Default)]
pub struct MemoryKeyValueStorage {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `set` fail like an exceeded quota.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| LexdeskError::internal(format!("Key-value lock poisoned: {}", e)))
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LexdeskError::storage_with(
                format!("Quota exceeded while writing '{}'", key),
                std::io::Error::new(std::io::ErrorKind::StorageFull, "quota exceeded"),
            ));
        }
        self.entries()?.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
