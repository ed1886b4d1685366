//! Job application domain.

pub mod model;

pub use model::{ApplicationDraft, ChatMessage, ChatRole, ContentEdit, JobApplicationRecord, JobStatus};
