pub mod autosave;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod job_application;
pub mod lawyer;
pub mod state;
pub mod storage;

// Re-export common error type
pub use error::{LexdeskError, Result};

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
