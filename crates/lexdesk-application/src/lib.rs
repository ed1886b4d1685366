//! Application layer for LexDesk.
//!
//! Coordinates the domain model and the storage layer: the debounced
//! autosave, checkpoints, the lawyer and job-application services, and the
//! session that ties them to the application state.

pub mod autosave;
pub mod bootstrap;
pub mod checkpoint;
pub mod job_applications;
pub mod lawyer_directory;
pub mod scheduler;
pub mod session;

pub use autosave::AutosaveController;
pub use bootstrap::{FileSession, start_file_session};
pub use checkpoint::CheckpointManager;
pub use job_applications::JobApplications;
pub use lawyer_directory::LawyerDirectory;
pub use scheduler::{ScheduledTask, Scheduler, TokioScheduler};
pub use session::AppSession;
