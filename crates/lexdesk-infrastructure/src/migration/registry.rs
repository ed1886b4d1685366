//! Migration registry for the linear schema chain.

use super::traits::SchemaMigration;
use crate::record_store::DatabaseImage;
use lexdesk_core::{LexdeskError, Result};
use std::sync::Arc;

/// Registry for a linear chain of schema steps.
///
/// Steps are stored in order and must form a continuous chain:
/// v0 → v1 → v2 → ...
///
/// When adding steps via `register()`, the registry validates that each
/// new step's `from_version()` matches the previous step's `to_version()`.
#[derive(Debug)]
pub struct MigrationRegistry {
    migrations: Vec<Arc<dyn SchemaMigration>>,
    latest_version: u32,
}

impl MigrationRegistry {
    pub fn new(latest_version: u32) -> Self {
        Self {
            migrations: Vec::new(),
            latest_version,
        }
    }

    /// Registers a single step, validating chain continuity.
    ///
    /// # Panics
    ///
    /// Panics if the step doesn't connect to the existing chain or goes
    /// past the registry's latest version.
    pub fn register(&mut self, migration: Arc<dyn SchemaMigration>) {
        if let Some(last) = self.migrations.last() {
            assert_eq!(
                last.to_version(),
                migration.from_version(),
                "Migration chain broken: expected step from {} (previous to_version), but got step from {}. \
                 Description: '{}' (previous) -> '{}' (current)",
                last.to_version(),
                migration.from_version(),
                last.description(),
                migration.description()
            );
        }

        if migration.to_version() > self.latest_version {
            panic!(
                "Migration target version {} exceeds registry's latest version {}",
                migration.to_version(),
                self.latest_version
            );
        }

        self.migrations.push(migration);
    }

    pub fn register_all(&mut self, migrations: Vec<Arc<dyn SchemaMigration>>) {
        for migration in migrations {
            self.register(migration);
        }
    }

    pub fn latest_version(&self) -> u32 {
        self.latest_version
    }

    /// Returns the starting version of the first step, if any.
    pub fn start_version(&self) -> Option<u32> {
        self.migrations.first().map(|m| m.from_version())
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    fn find_start_index(&self, from_version: u32) -> Option<usize> {
        self.migrations
            .iter()
            .position(|m| m.from_version() == from_version)
    }

    /// Runs every step between `current_version` and `target_version`, in
    /// order, then stamps the image with `target_version`.
    ///
    /// # Errors
    ///
    /// - `Version` if the image is newer than the target (no downgrades)
    /// - `Migration` if the target is beyond the chain, no step starts at
    ///   `current_version`, or a step fails
    pub fn migrate(
        &self,
        image: &mut DatabaseImage,
        current_version: u32,
        target_version: u32,
    ) -> Result<()> {
        if current_version == target_version {
            tracing::debug!(
                "Database is already at version {}, no migration needed",
                current_version
            );
            return Ok(());
        }

        if current_version > target_version {
            return Err(LexdeskError::Version {
                requested: target_version,
                stored: current_version,
            });
        }

        if target_version > self.latest_version {
            return Err(LexdeskError::migration(format!(
                "Requested version {} is newer than the latest supported version {}",
                target_version, self.latest_version
            )));
        }

        let start_idx = self.find_start_index(current_version).ok_or_else(|| {
            let available: Vec<String> = self
                .migrations
                .iter()
                .map(|m| format!("{} -> {}", m.from_version(), m.to_version()))
                .collect();
            LexdeskError::migration(format!(
                "No migration found starting from version {}. Available migrations: [{}]",
                current_version,
                available.join(", ")
            ))
        })?;

        let steps: Vec<_> = self.migrations[start_idx..]
            .iter()
            .take_while(|m| m.to_version() <= target_version)
            .collect();

        tracing::info!(
            "Starting schema migration from {} to {} ({} steps)",
            current_version,
            target_version,
            steps.len()
        );

        for (i, migration) in steps.iter().enumerate() {
            tracing::info!(
                "Migration step {}/{}: {} -> {} ({})",
                i + 1,
                steps.len(),
                migration.from_version(),
                migration.to_version(),
                migration.description()
            );

            migration.apply(image).map_err(|e| {
                LexdeskError::migration(format!(
                    "Migration failed at step {}: {} -> {}: {}",
                    i + 1,
                    migration.from_version(),
                    migration.to_version(),
                    e
                ))
            })?;
        }

        let reached = steps.last().map(|m| m.to_version()).unwrap_or(current_version);
        if reached != target_version {
            return Err(LexdeskError::migration(format!(
                "Migration chain stops at version {} before reaching {}",
                reached, target_version
            )));
        }

        image.version = target_version;
        tracing::info!(
            "Schema migration completed successfully: {} -> {}",
            current_version,
            target_version
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct RecordingMigration {
        from: u32,
        to: u32,
        log: Arc<Mutex<Vec<u32>>>,
    }

    impl SchemaMigration for RecordingMigration {
        fn from_version(&self) -> u32 {
            self.from
        }

        fn to_version(&self) -> u32 {
            self.to
        }

        fn description(&self) -> &str {
            "recording"
        }

        fn apply(&self, _image: &mut DatabaseImage) -> Result<()> {
            self.log.lock().unwrap().push(self.to);
            Ok(())
        }
    }

    fn registry_with_steps(latest: u32, log: &Arc<Mutex<Vec<u32>>>) -> MigrationRegistry {
        let mut registry = MigrationRegistry::new(latest);
        for from in 0..latest {
            registry.register(Arc::new(RecordingMigration {
                from,
                to: from + 1,
                log: Arc::clone(log),
            }));
        }
        registry
    }

    #[test]
    fn test_empty_registry() {
        let registry = MigrationRegistry::new(1);
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    #[should_panic(expected = "Migration chain broken")]
    fn test_register_broken_chain() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = MigrationRegistry::new(3);
        registry.register(Arc::new(RecordingMigration {
            from: 0,
            to: 1,
            log: Arc::clone(&log),
        }));
        registry.register(Arc::new(RecordingMigration { from: 2, to: 3, log }));
    }

    #[test]
    fn test_runs_only_missing_steps_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_steps(4, &log);
        let mut image = DatabaseImage::new("db");
        image.version = 1;

        registry.migrate(&mut image, 1, 3).unwrap();

        assert_eq!(*log.lock().unwrap(), vec![2, 3]);
        assert_eq!(image.version, 3);
    }

    #[test]
    fn test_same_version_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_steps(2, &log);
        let mut image = DatabaseImage::new("db");
        image.version = 2;

        registry.migrate(&mut image, 2, 2).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_downgrade_is_version_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_steps(2, &log);
        let mut image = DatabaseImage::new("db");

        let err = registry.migrate(&mut image, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            LexdeskError::Version {
                requested: 1,
                stored: 2
            }
        ));
    }

    #[test]
    fn test_target_beyond_latest_fails() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let registry = registry_with_steps(2, &log);
        let mut image = DatabaseImage::new("db");

        let err = registry.migrate(&mut image, 0, 5).unwrap_err();
        assert!(matches!(err, LexdeskError::Migration(_)));
        assert_eq!(image.version, 0);
    }
}
