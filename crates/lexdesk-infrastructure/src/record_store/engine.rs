//! Storage engines behind the versioned record store.

use super::image::DatabaseImage;
use crate::storage::AtomicJsonFile;
use lexdesk_core::{LexdeskError, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Reads and writes a whole database image.
///
/// A `write` either replaces the stored image completely or leaves it
/// untouched; the store builds its per-batch transactions on that.
pub trait StorageEngine: Send + Sync + 'static {
    /// Returns the stored image, or `None` if the database does not exist.
    fn read(&self) -> Result<Option<DatabaseImage>>;

    fn write(&self, image: &DatabaseImage) -> Result<()>;
}

/// One JSON document per database, written atomically.
pub struct JsonFileEngine {
    file: AtomicJsonFile<DatabaseImage>,
}

impl JsonFileEngine {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }
}

impl StorageEngine for JsonFileEngine {
    fn read(&self) -> Result<Option<DatabaseImage>> {
        self.file.load()
    }

    fn write(&self, image: &DatabaseImage) -> Result<()> {
        self.file.save(image)
    }
}

/// Engine holding the image in memory.
///
/// Counts reads and writes and can be told to fail writes, which is what
/// the store tests use to observe opens and atomicity.
#[derive(Default)]
pub struct MemoryEngine {
    image: Mutex<Option<DatabaseImage>>,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing image, as if it had been written earlier.
    pub fn with_image(image: DatabaseImage) -> Self {
        Self {
            image: Mutex::new(Some(image)),
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// The last committed image.
    pub fn snapshot(&self) -> Option<DatabaseImage> {
        self.image.lock().ok().and_then(|image| image.clone())
    }
}

impl StorageEngine for MemoryEngine {
    fn read(&self) -> Result<Option<DatabaseImage>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let image = self
            .image
            .lock()
            .map_err(|e| LexdeskError::internal(format!("Engine lock poisoned: {}", e)))?;
        Ok(image.clone())
    }

    fn write(&self, image: &DatabaseImage) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LexdeskError::storage_with(
                "Engine write failed",
                std::io::Error::new(std::io::ErrorKind::StorageFull, "quota exceeded"),
            ));
        }
        let mut stored = self
            .image
            .lock()
            .map_err(|e| LexdeskError::internal(format!("Engine lock poisoned: {}", e)))?;
        *stored = Some(image.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
