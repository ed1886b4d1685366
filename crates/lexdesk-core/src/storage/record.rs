//! Record collections and the repository interface over them.

use crate::error::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

/// Every collection held by the versioned store.
///
/// Adding a collection requires a new variant here, a key path in
/// `key_path()`, and a schema step that ensures it exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    /// Lawyers found by the lawyer search tool, keyed by website.
    Lawyers,
    /// Job applications produced by the job assistant, keyed by id.
    JobApplications,
}

impl Collection {
    pub const fn all() -> &'static [Collection] {
        &[Collection::Lawyers, Collection::JobApplications]
    }

    /// Name of the collection inside the database image.
    pub const fn name(&self) -> &'static str {
        match self {
            Collection::Lawyers => "lawyers",
            Collection::JobApplications => "jobApplications",
        }
    }

    /// Field of the serialized record that holds its natural key.
    pub const fn key_path(&self) -> &'static str {
        match self {
            Collection::Lawyers => "website",
            Collection::JobApplications => "id",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored in one collection of the versioned store.
///
/// The store derives the natural key from the serialized record using
/// `Collection::key_path`, so the key field must serialize as a string.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Orders records returned by `get_all`. Key order by default.
    fn sort_for_listing(_records: &mut [Self]) {}
}

/// Repository interface over the versioned record store.
///
/// Operations issued before `open()` has completed fail with
/// `LexdeskError::NotInitialized`.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Opens (creating if absent) the store and runs pending schema steps.
    ///
    /// Idempotent. Concurrent callers share a single underlying open.
    async fn open(&self) -> Result<()>;

    /// Returns every record of `R`'s collection.
    async fn get_all<R: Record>(&self) -> Result<Vec<R>>;

    /// Returns the record stored under `key`, if any.
    async fn get<R: Record>(&self, key: &str) -> Result<Option<R>>;

    /// Writes a batch in one transaction. Last write wins on duplicate keys.
    async fn upsert_many<R: Record>(&self, records: &[R]) -> Result<()>;

    /// Adds a record; fails with `DuplicateKey` if the key exists.
    async fn insert_one<R: Record>(&self, record: &R) -> Result<()>;

    /// Inserts or overwrites a record.
    async fn update_one<R: Record>(&self, record: &R) -> Result<()>;

    /// Reads, changes and writes back the record under `key` in one
    /// transaction, so concurrent changes to the same record never overwrite
    /// each other.
    ///
    /// Returns the updated record, or `None` if the key is absent. If `change`
    /// fails nothing is written. The change must not alter the natural key.
    async fn modify<R, F>(&self, key: &str, change: F) -> Result<Option<R>>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<()> + Send;

    /// Removes the record under `key`. Absent keys are ignored.
    async fn delete<R: Record>(&self, key: &str) -> Result<()>;

    /// Removes every record of a collection in one transaction.
    async fn clear(&self, collection: Collection) -> Result<()>;
}
