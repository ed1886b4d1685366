//! Core trait for schema steps.

use crate::record_store::DatabaseImage;
use lexdesk_core::Result;

/// One step of the schema chain.
pub trait SchemaMigration: Send + Sync + std::fmt::Debug {
    /// Returns the version this step starts from.
    fn from_version(&self) -> u32;

    /// Returns the version this step produces.
    fn to_version(&self) -> u32;

    /// Returns a human-readable description of this step.
    ///
    /// Used for logging and debugging purposes.
    fn description(&self) -> &str;

    /// Applies the step to the image.
    fn apply(&self, image: &mut DatabaseImage) -> Result<()>;
}
