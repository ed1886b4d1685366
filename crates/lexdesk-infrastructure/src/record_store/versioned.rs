//! Versioned record store over a pluggable storage engine.

use super::engine::StorageEngine;
use super::image::{CollectionImage, DatabaseImage};
use crate::migration::{build_schema_registry, MigrationRegistry};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use lexdesk_core::storage::{Collection, Record, RecordStore};
use lexdesk_core::{LexdeskError, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex as StdMutex, OnceLock};
use tokio::sync::Mutex;

type OpenFuture = Shared<BoxFuture<'static, Result<()>>>;

/// Record store opened at a fixed name and schema version.
///
/// All operations against the open database go through one async mutex, so
/// batches never interleave. Every mutation is staged on a copy of the
/// image, written through the engine, and only then committed in memory:
/// a failed write leaves both the engine and the store untouched.
///
/// # Example
///
/// ```ignore
/// let store = VersionedStore::new("lexdesk", 2, JsonFileEngine::new(path));
/// store.open().await?;
/// store.upsert_many(&lawyers).await?;
/// let jobs: Vec<JobApplicationRecord> = store.get_all().await?;
/// ```
pub struct VersionedStore<E: StorageEngine> {
    name: String,
    version: u32,
    engine: Arc<E>,
    registry: Arc<MigrationRegistry>,
    /// Set once the single underlying open has succeeded.
    database: Arc<OnceLock<Mutex<DatabaseImage>>>,
    /// The open in flight (or finished), shared by concurrent callers.
    opening: StdMutex<Option<OpenFuture>>,
}

impl<E: StorageEngine> VersionedStore<E> {
    /// Creates a store using the built-in schema steps.
    pub fn new(name: impl Into<String>, version: u32, engine: E) -> Self {
        Self::with_registry(name, version, Arc::new(engine), build_schema_registry())
    }

    /// Creates a store sharing an engine, with custom schema steps.
    pub fn with_registry(
        name: impl Into<String>,
        version: u32,
        engine: Arc<E>,
        registry: MigrationRegistry,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            engine,
            registry: Arc::new(registry),
            database: Arc::new(OnceLock::new()),
            opening: StdMutex::new(None),
        }
    }

    /// Creates a store sharing an engine with the built-in schema steps.
    pub fn shared(name: impl Into<String>, version: u32, engine: Arc<E>) -> Self {
        Self::with_registry(name, version, engine, build_schema_registry())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn is_open(&self) -> bool {
        self.database.get().is_some()
    }

    fn database(&self) -> Result<&Mutex<DatabaseImage>> {
        self.database
            .get()
            .ok_or_else(|| LexdeskError::not_initialized(&self.name))
    }

    fn open_future(&self) -> OpenFuture {
        let engine = Arc::clone(&self.engine);
        let registry = Arc::clone(&self.registry);
        let database = Arc::clone(&self.database);
        let name = self.name.clone();
        let version = self.version;

        async move {
            let image = tokio::task::spawn_blocking(move || {
                open_image(engine.as_ref(), &registry, &name, version)
            })
            .await
            .map_err(|e| LexdeskError::internal(format!("Failed to join open task: {}", e)))??;

            // Only this future ever sets the cell.
            let _ = database.set(Mutex::new(image));
            Ok(())
        }
        .boxed()
        .shared()
    }

    /// Stages a change on a copy of the image, persists it, then commits it.
    async fn transaction<T, F>(&self, collection: Collection, change: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut CollectionImage) -> Result<T> + Send,
    {
        let database = self.database()?;
        let mut current = database.lock().await;

        let mut staged = current.clone();
        let outcome = change(staged.collection_mut(collection)?)?;

        let engine = Arc::clone(&self.engine);
        let (staged, written) = tokio::task::spawn_blocking(move || {
            let written = engine.write(&staged);
            (staged, written)
        })
        .await
        .map_err(|e| LexdeskError::internal(format!("Failed to join write task: {}", e)))?;
        written?;

        *current = staged;
        Ok(outcome)
    }
}

/// Reads the database, creating and migrating it as needed.
fn open_image<E: StorageEngine>(
    engine: &E,
    registry: &MigrationRegistry,
    name: &str,
    version: u32,
) -> Result<DatabaseImage> {
    let mut image = match engine.read()? {
        Some(image) => image,
        None => {
            tracing::info!(store = name, "Creating new database");
            DatabaseImage::new(name)
        }
    };

    let stored_version = image.version;
    if stored_version > version {
        return Err(LexdeskError::Version {
            requested: version,
            stored: stored_version,
        });
    }

    if stored_version < version {
        registry.migrate(&mut image, stored_version, version)?;
        engine.write(&image)?;
    }

    tracing::debug!(
        store = name,
        version,
        collections = image.collections.len(),
        "Database opened"
    );
    Ok(image)
}

fn to_value<R: Record>(record: &R) -> Result<JsonValue> {
    serde_json::to_value(record).map_err(|e| {
        LexdeskError::invalid_record(R::COLLECTION.name(), format!("not serializable: {}", e))
    })
}

fn from_value<R: Record>(value: &JsonValue) -> Result<R> {
    R::deserialize(value).map_err(|e| {
        LexdeskError::storage_with(
            format!("Corrupt record in collection '{}'", R::COLLECTION),
            e,
        )
    })
}

#[async_trait]
impl<E: StorageEngine> RecordStore for VersionedStore<E> {
    async fn open(&self) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }

        let open = {
            let mut opening = self
                .opening
                .lock()
                .map_err(|e| LexdeskError::internal(format!("Open lock poisoned: {}", e)))?;
            match opening.as_ref() {
                Some(open) => open.clone(),
                None => {
                    let open = self.open_future();
                    *opening = Some(open.clone());
                    open
                }
            }
        };

        let result = open.clone().await;

        if result.is_err() {
            // Let a later call retry, unless someone already did.
            if let Ok(mut opening) = self.opening.lock() {
                if opening.as_ref().is_some_and(|current| current.ptr_eq(&open)) {
                    *opening = None;
                }
            }
        }

        result
    }

    async fn get_all<R: Record>(&self) -> Result<Vec<R>> {
        let database = self.database()?;
        let image = database.lock().await;

        let mut records = image
            .collection(R::COLLECTION)?
            .records
            .values()
            .map(from_value::<R>)
            .collect::<Result<Vec<R>>>()?;
        R::sort_for_listing(&mut records);
        Ok(records)
    }

    async fn get<R: Record>(&self, key: &str) -> Result<Option<R>> {
        let database = self.database()?;
        let image = database.lock().await;

        image
            .collection(R::COLLECTION)?
            .records
            .get(key)
            .map(from_value::<R>)
            .transpose()
    }

    async fn upsert_many<R: Record>(&self, records: &[R]) -> Result<()> {
        let values = records.iter().map(to_value).collect::<Result<Vec<_>>>()?;
        let count = values.len();

        self.transaction(R::COLLECTION, |collection| {
            for value in values {
                let key = collection.key_of(R::COLLECTION.name(), &value)?;
                collection.records.insert(key, value);
            }
            Ok(())
        })
        .await?;

        tracing::debug!(collection = R::COLLECTION.name(), count, "Upserted batch");
        Ok(())
    }

    async fn insert_one<R: Record>(&self, record: &R) -> Result<()> {
        let value = to_value(record)?;

        self.transaction(R::COLLECTION, |collection| {
            let key = collection.key_of(R::COLLECTION.name(), &value)?;
            if collection.records.contains_key(&key) {
                return Err(LexdeskError::duplicate_key(R::COLLECTION.name(), key));
            }
            collection.records.insert(key, value);
            Ok(())
        })
        .await
    }

    async fn update_one<R: Record>(&self, record: &R) -> Result<()> {
        let value = to_value(record)?;

        self.transaction(R::COLLECTION, |collection| {
            let key = collection.key_of(R::COLLECTION.name(), &value)?;
            collection.records.insert(key, value);
            Ok(())
        })
        .await
    }

    async fn modify<R, F>(&self, key: &str, change: F) -> Result<Option<R>>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<()> + Send,
    {
        self.transaction(R::COLLECTION, |collection| {
            let Some(stored) = collection.records.get(key) else {
                return Ok(None);
            };
            let mut record = from_value::<R>(stored)?;
            change(&mut record)?;

            let value = to_value(&record)?;
            let new_key = collection.key_of(R::COLLECTION.name(), &value)?;
            if new_key != key {
                return Err(LexdeskError::invalid_record(
                    R::COLLECTION.name(),
                    format!("modify changed key '{}' to '{}'", key, new_key),
                ));
            }
            collection.records.insert(new_key, value);
            Ok(Some(record))
        })
        .await
    }

    async fn delete<R: Record>(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.transaction(R::COLLECTION, move |collection| {
            collection.records.remove(&key);
            Ok(())
        })
        .await
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        self.transaction(collection, |collection| {
            collection.records.clear();
            Ok(())
        })
        .await?;

        tracing::info!(collection = collection.name(), "Cleared collection");
        Ok(())
    }
}
