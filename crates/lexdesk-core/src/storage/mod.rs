//! Storage abstractions shared by every persistence component.
//!
//! The key-value side backs the autosave blob and the checkpoint list; the
//! record side backs the versioned collection store.

mod key_value;
mod record;

pub use key_value::{KeyValueStorage, AUTOSAVE_KEY, CHECKPOINTS_KEY};
pub use record::{Collection, Record, RecordStore};
