//! Error types for the LexDesk persistence core.

use std::sync::Arc;
use thiserror::Error;

/// Underlying cause attached to a storage failure.
///
/// Shared behind an `Arc` so the error stays `Clone`: a single failed store
/// open is reported to every caller that was waiting on it.
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A shared error type for the entire LexDesk workspace.
#[derive(Error, Debug, Clone)]
pub enum LexdeskError {
    /// Persisted JSON (autosave blob, checkpoint list) could not be parsed.
    #[error("Parse error in '{key}': {message}")]
    Parse { key: String, message: String },

    /// A store operation was attempted before `open()` completed.
    #[error("Store '{store}' is not initialized; await open() first")]
    NotInitialized { store: String },

    /// Insert-only write hit an existing natural key.
    #[error("Duplicate key '{key}' in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Quota exceeded, I/O failure or any other engine failure.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        cause: Option<ErrorCause>,
    },

    /// A record does not carry the collection's key field.
    #[error("Invalid record for collection '{collection}': {message}")]
    InvalidRecord { collection: String, message: String },

    /// The database on disk is newer than the version requested.
    #[error("Version error: requested version {requested} is older than stored version {stored}")]
    Version { requested: u32, stored: u32 },

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LexdeskError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Parse error
    pub fn parse(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a NotInitialized error
    pub fn not_initialized(store: impl Into<String>) -> Self {
        Self::NotInitialized {
            store: store.into(),
        }
    }

    /// Creates a DuplicateKey error
    pub fn duplicate_key(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error without an attached cause
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            cause: None,
        }
    }

    /// Creates a Storage error carrying the original cause
    pub fn storage_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Creates an InvalidRecord error
    pub fn invalid_record(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::NotInitialized { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Message shown to the user when an explicit persistence action fails.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound {
                entity_type: "checkpoint",
                ..
            } => "Checkpoint no longer exists".to_string(),
            Self::Storage { message, .. } => format!("Could not save: {}", message),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LexdeskError {
    fn from(err: std::io::Error) -> Self {
        let message = format!("{} (kind: {:?})", err, err.kind());
        Self::storage_with(message, err)
    }
}

impl From<serde_json::Error> for LexdeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {}", err))
    }
}

impl From<toml::de::Error> for LexdeskError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for LexdeskError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Conversion from anyhow::Error (transitional, used by the CLI boundary)
impl From<anyhow::Error> for LexdeskError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, LexdeskError>`.
pub type Result<T> = std::result::Result<T, LexdeskError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_storage_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::StorageFull, "quota exceeded");
        let err = LexdeskError::from(io);

        assert!(err.is_storage());
        let source = err.source().expect("cause should be attached");
        assert!(source.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_clone_shares_cause() {
        let err = LexdeskError::storage_with(
            "disk failure",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
        assert!(cloned.source().is_some());
    }

    #[test]
    fn test_checkpoint_not_found_user_message() {
        let err = LexdeskError::not_found("checkpoint", "abc");
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Checkpoint no longer exists");
    }

    #[test]
    fn test_duplicate_key_display() {
        let err = LexdeskError::duplicate_key("jobApplications", "job-1");
        assert!(err.is_duplicate_key());
        assert_eq!(
            err.to_string(),
            "Duplicate key 'job-1' in collection 'jobApplications'"
        );
    }
}
