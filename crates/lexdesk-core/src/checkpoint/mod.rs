//! Named, user-created snapshots of the whole application state.

pub mod model;

pub use model::{Checkpoint, CheckpointSummary};
