//! Schema migration framework for the record store.
//!
//! Schema versions are plain integers. Each step moves a database image
//! from one version to the next, and steps form a linear chain:
//!
//! ```text
//!   v0 (new) ──► v1: ensure `lawyers`
//!            ──► v2: ensure `jobApplications`
//! ```
//!
//! Steps only run while the store is being opened. They create what is
//! missing and never touch existing collections or their records.
//!
//! # Adding a schema version
//!
//! 1. Add the new `Collection` variant in `lexdesk-core`
//! 2. Bump `CURRENT_SCHEMA_VERSION`
//! 3. Register an `EnsureCollections` step in `build_schema_registry()`

mod registry;
mod steps;
mod traits;

pub use registry::MigrationRegistry;
pub use steps::EnsureCollections;
pub use traits::SchemaMigration;

use lexdesk_core::config::CURRENT_SCHEMA_VERSION;
use lexdesk_core::storage::Collection;
use std::sync::Arc;

/// Builds the registry holding every schema step up to the current version.
pub fn build_schema_registry() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new(CURRENT_SCHEMA_VERSION);

    registry.register_all(vec![
        Arc::new(EnsureCollections::new(
            0,
            1,
            "Create lawyers collection",
            vec![Collection::Lawyers],
        )),
        Arc::new(EnsureCollections::new(
            1,
            2,
            "Create job applications collection",
            vec![Collection::JobApplications],
        )),
    ]);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_store::DatabaseImage;

    #[test]
    fn test_registry_reaches_current_version() {
        let registry = build_schema_registry();
        assert_eq!(registry.latest_version(), CURRENT_SCHEMA_VERSION);
        assert_eq!(registry.start_version(), Some(0));
        assert_eq!(registry.len(), CURRENT_SCHEMA_VERSION as usize);
    }

    #[test]
    fn test_every_collection_is_created_by_some_step() {
        let registry = build_schema_registry();
        let mut image = DatabaseImage::new("lexdesk");
        registry
            .migrate(&mut image, 0, CURRENT_SCHEMA_VERSION)
            .unwrap();

        for collection in Collection::all() {
            assert!(image.has_collection(*collection), "{}", collection);
        }
    }
}
