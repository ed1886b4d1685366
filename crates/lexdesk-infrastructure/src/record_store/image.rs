//! In-memory image of a whole record store database.

use lexdesk_core::storage::Collection;
use lexdesk_core::{LexdeskError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// One collection: its declared key path and its records by natural key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionImage {
    pub key_path: String,
    pub records: BTreeMap<String, JsonValue>,
}

impl CollectionImage {
    pub fn new(key_path: impl Into<String>) -> Self {
        Self {
            key_path: key_path.into(),
            records: BTreeMap::new(),
        }
    }

    /// Reads the natural key out of a serialized record.
    pub fn key_of(&self, collection: &str, record: &JsonValue) -> Result<String> {
        match record.get(&self.key_path).and_then(JsonValue::as_str) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(LexdeskError::invalid_record(
                collection,
                format!("missing string key field '{}'", self.key_path),
            )),
        }
    }
}

/// The unit the storage engines read and write.
///
/// `version` 0 means the database was just created and no schema step has
/// run yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseImage {
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub collections: BTreeMap<String, CollectionImage>,
}

impl DatabaseImage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 0,
            collections: BTreeMap::new(),
        }
    }

    pub fn has_collection(&self, collection: Collection) -> bool {
        self.collections.contains_key(collection.name())
    }

    /// Creates the collection if it is missing. Existing records are kept.
    pub fn ensure_collection(&mut self, collection: Collection) -> bool {
        if self.has_collection(collection) {
            return false;
        }
        self.collections.insert(
            collection.name().to_string(),
            CollectionImage::new(collection.key_path()),
        );
        true
    }

    pub fn collection(&self, collection: Collection) -> Result<&CollectionImage> {
        self.collections
            .get(collection.name())
            .ok_or_else(|| LexdeskError::not_found("collection", collection.name()))
    }

    pub fn collection_mut(&mut self, collection: Collection) -> Result<&mut CollectionImage> {
        self.collections
            .get_mut(collection.name())
            .ok_or_else(|| LexdeskError::not_found("collection", collection.name()))
    }
}
