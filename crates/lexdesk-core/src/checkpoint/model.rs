//! Checkpoint domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A named snapshot of the full application state.
///
/// The state is kept as an opaque JSON value; the checkpoint layer never
/// interprets it. Checkpoints are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    pub name: String,
    pub state: JsonValue,
}

/// Listing view of a checkpoint, without the state payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSummary {
    pub id: String,
    pub name: String,
    pub timestamp: i64,
}

impl Checkpoint {
    pub fn summary(&self) -> CheckpointSummary {
        CheckpointSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_drops_state() {
        let checkpoint = Checkpoint {
            id: "cp-1".to_string(),
            timestamp: 1_700_000_000_000,
            name: "Before edits".to_string(),
            state: json!({ "report": { "title": "Draft" } }),
        };

        let summary = checkpoint.summary();
        assert_eq!(summary.id, "cp-1");
        assert_eq!(summary.name, "Before edits");
        assert_eq!(summary.timestamp, 1_700_000_000_000);
    }
}
