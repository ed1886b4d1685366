//! String-keyed storage for small JSON blobs.

use crate::error::Result;

/// Key under which the autosave snapshot is persisted.
pub const AUTOSAVE_KEY: &str = "lexdesk.autosave";

/// Key under which the checkpoint list is persisted.
pub const CHECKPOINTS_KEY: &str = "lexdesk.checkpoints";

/// A simple string-keyed storage (get by key, set by key).
///
/// Calls are synchronous; they run on the caller's thread like the
/// browser storage they stand in for. Async callers that must not block
/// wrap them in `spawn_blocking`.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
