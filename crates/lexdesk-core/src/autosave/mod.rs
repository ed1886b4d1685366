//! Autosave snapshot of in-progress form inputs.

pub mod snapshot;

pub use snapshot::{AUTOSAVE_FIELDS, AutoSaveSnapshot, FieldValue, SaveStatus};
