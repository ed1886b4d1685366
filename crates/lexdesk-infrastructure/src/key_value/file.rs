//! File-backed key-value storage.

use crate::storage::AtomicJsonFile;
use lexdesk_core::storage::KeyValueStorage;
use lexdesk_core::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// All keys live in one JSON object on disk, updated atomically.
///
/// Values are opaque strings: the file stays readable even when a stored
/// value is not valid JSON itself. An unparsable file reads as empty and is
/// moved aside by the next write.
pub struct FileKeyValueStorage {
    file: AtomicJsonFile<BTreeMap<String, String>>,
}

impl FileKeyValueStorage {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path).with_corrupt_recovery(),
        }
    }
}

impl KeyValueStorage for FileKeyValueStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .file
            .load()?
            .and_then(|mut entries| entries.remove(key)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, bytes = value.len(), "Writing key-value entry");
        self.file.update(BTreeMap::new(), |entries| {
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.file.update(BTreeMap::new(), |entries| {
            entries.remove(key);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_get_missing_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileKeyValueStorage::new(temp_dir.path().join("kv.json"));
        assert!(storage.get("lexdesk.autosave").unwrap().is_none());
    }

    #[test]
    fn test_set_get_and_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileKeyValueStorage::new(temp_dir.path().join("kv.json"));

        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.set("a", "3").unwrap();

        assert_eq!(storage.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_non_json_values_survive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.json");
        FileKeyValueStorage::new(path.clone())
            .set("lexdesk.autosave", "{ broken")
            .unwrap();

        let reopened = FileKeyValueStorage::new(path);
        assert_eq!(
            reopened.get("lexdesk.autosave").unwrap().as_deref(),
            Some("{ broken")
        );
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileKeyValueStorage::new(temp_dir.path().join("kv.json"));

        storage.remove("never-written").unwrap();
        storage.set("a", "1").unwrap();
        storage.remove("a").unwrap();
        assert!(storage.get("a").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_empty_and_accepts_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");
        std::fs::write(&path, r#"{ "lexdesk.autosave": "{\"report.ti"#).unwrap();

        let storage = FileKeyValueStorage::new(path.clone());
        assert!(storage.get("lexdesk.autosave").unwrap().is_none());

        storage.set("lexdesk.checkpoints", "[]").unwrap();
        assert_eq!(
            storage.get("lexdesk.checkpoints").unwrap().as_deref(),
            Some("[]")
        );
        assert!(storage.get("lexdesk.autosave").unwrap().is_none());
    }

    #[test]
    fn test_concurrent_sets_keep_every_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.json");

        for _ in 0..5 {
            let _ = std::fs::remove_file(&path);
            std::thread::scope(|scope| {
                for i in 0..16 {
                    let path = path.clone();
                    scope.spawn(move || {
                        FileKeyValueStorage::new(path)
                            .set(&format!("key-{}", i), &i.to_string())
                            .unwrap();
                    });
                }
            });

            let storage = FileKeyValueStorage::new(path.clone());
            for i in 0..16 {
                assert_eq!(
                    storage.get(&format!("key-{}", i)).unwrap(),
                    Some(i.to_string())
                );
            }
        }
    }
}
