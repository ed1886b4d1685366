//! Schema steps shipped with the store.

use super::traits::SchemaMigration;
use crate::record_store::DatabaseImage;
use lexdesk_core::storage::Collection;
use lexdesk_core::Result;

/// Ensures a set of collections exists.
#[derive(Debug)]
pub struct EnsureCollections {
    from: u32,
    to: u32,
    description: &'static str,
    collections: Vec<Collection>,
}

impl EnsureCollections {
    pub fn new(
        from: u32,
        to: u32,
        description: &'static str,
        collections: Vec<Collection>,
    ) -> Self {
        Self {
            from,
            to,
            description,
            collections,
        }
    }
}

impl SchemaMigration for EnsureCollections {
    fn from_version(&self) -> u32 {
        self.from
    }

    fn to_version(&self) -> u32 {
        self.to
    }

    fn description(&self) -> &str {
        self.description
    }

    fn apply(&self, image: &mut DatabaseImage) -> Result<()> {
        for collection in &self.collections {
            if image.ensure_collection(*collection) {
                tracing::info!(collection = collection.name(), "Created collection");
            } else {
                tracing::debug!(collection = collection.name(), "Collection already exists");
            }
        }
        Ok(())
    }
}
