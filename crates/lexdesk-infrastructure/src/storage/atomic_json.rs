//! Atomic JSON file operations with ACID guarantees.
//!
//! Every persistent file of the workspace (key-value blob, record store
//! image) goes through this layer.

use lexdesk_core::{LexdeskError, Result, now_millis};
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A handle to an atomic JSON file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via a unique temp file + atomic rename
/// - **Consistency**: the document is parsed on load and serialized on save
/// - **Isolation**: an exclusive lock on a persistent lock file serializes writers
/// - **Durability**: Explicit fsync before rename
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    recover_corrupt: bool,
    _phantom: PhantomData<T>,
}

/// Outcome of reading the file from disk.
enum Contents<T> {
    Missing,
    Parsed(T),
    Corrupt(serde_json::Error),
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            recover_corrupt: false,
            _phantom: PhantomData,
        }
    }

    /// Treats an unparsable file as absent instead of failing.
    ///
    /// Reads log a warning and return `None`. The next locked write moves the
    /// bad file aside (`<name>.corrupt-<epoch ms>`) and starts from the default.
    pub fn with_corrupt_recovery(mut self) -> Self {
        self.recover_corrupt = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is empty, or is corrupt and recovery is on
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>> {
        match self.read_contents()? {
            Contents::Missing => Ok(None),
            Contents::Parsed(data) => Ok(Some(data)),
            Contents::Corrupt(e) if self.recover_corrupt => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring unreadable storage file"
                );
                Ok(None)
            }
            Contents::Corrupt(e) => Err(self.corrupt_error(e)),
        }
    }

    /// Saves data to the file atomically while holding the write lock.
    pub fn save(&self, data: &T) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;
        self.write_unlocked(data)
    }

    /// Performs a transactional read-modify-write under the file lock.
    ///
    /// If `f` fails nothing is written.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.read_contents()? {
            Contents::Missing => default_value,
            Contents::Parsed(data) => data,
            Contents::Corrupt(e) if self.recover_corrupt => {
                let moved_to = self.quarantine()?;
                tracing::warn!(
                    path = %self.path.display(),
                    moved_to = %moved_to.display(),
                    error = %e,
                    "Moved unreadable storage file aside"
                );
                default_value
            }
            Contents::Corrupt(e) => return Err(self.corrupt_error(e)),
        };
        f(&mut data)?;
        self.write_unlocked(&data)
    }

    fn read_contents(&self) -> Result<Contents<T>> {
        if !self.path.exists() {
            return Ok(Contents::Missing);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(Contents::Missing);
        }

        Ok(match serde_json::from_str(&content) {
            Ok(data) => Contents::Parsed(data),
            Err(e) => Contents::Corrupt(e),
        })
    }

    fn corrupt_error(&self, e: serde_json::Error) -> LexdeskError {
        LexdeskError::storage_with(format!("Corrupt storage file {}", self.path.display()), e)
    }

    /// Renames the current file out of the way. Caller holds the lock.
    fn quarantine(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| LexdeskError::storage("Path has no file name"))?;
        let target = self.path.with_file_name(format!(
            "{}.corrupt-{}",
            file_name.to_string_lossy(),
            now_millis()
        ));
        fs::rename(&self.path, &target)?;
        Ok(target)
    }

    fn write_unlocked(&self, data: &T) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| LexdeskError::storage("Path has no parent directory"))?;
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(data)?;

        // Unique temporary file in the same directory
        let mut tmp_file = NamedTempFile::new_in(parent)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.as_file().sync_all()?;

        tmp_file.persist(&self.path).map_err(|e| {
            LexdeskError::storage_with(
                format!("Failed to replace {}", self.path.display()),
                e.error,
            )
        })?;

        Ok(())
    }
}

/// Exclusive lock held for the lifetime of the guard.
///
/// The lock file is never removed, so every writer locks the same inode.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive().map_err(|e| {
                LexdeskError::storage_with(
                    format!("Failed to lock {}", lock_path.display()),
                    e,
                )
            })?;
        }

        Ok(FileLock { _file: file })
    }
}
