//! The running application session.
//!
//! `AppSession` owns the current [`AppState`] and ties together the reducer,
//! the autosave controller, the checkpoint manager and the record store
//! services. Tools only ever dispatch actions; persistence follows from them.

use crate::autosave::AutosaveController;
use crate::checkpoint::CheckpointManager;
use crate::job_applications::JobApplications;
use crate::lawyer_directory::LawyerDirectory;
use crate::scheduler::Scheduler;
use lexdesk_core::autosave::{AutoSaveSnapshot, SaveStatus};
use lexdesk_core::checkpoint::CheckpointSummary;
use lexdesk_core::config::AutosaveConfig;
use lexdesk_core::job_application::{ApplicationDraft, JobApplicationRecord};
use lexdesk_core::lawyer::LawyerRecord;
use lexdesk_core::state::{Action, AppState, reduce};
use lexdesk_core::storage::{KeyValueStorage, RecordStore};
use lexdesk_core::{LexdeskError, Result};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tracing::{debug, info};

pub struct AppSession<S> {
    state: RwLock<AppState>,
    autosave: AutosaveController,
    checkpoints: CheckpointManager,
    lawyers: LawyerDirectory<S>,
    jobs: JobApplications<S>,
}

impl<S: RecordStore> AppSession<S> {
    /// Opens the record store, then rebuilds the state from the autosave
    /// snapshot and loads the checkpoint list.
    pub async fn start(
        store: Arc<S>,
        storage: Arc<dyn KeyValueStorage>,
        scheduler: Arc<dyn Scheduler>,
        config: &AutosaveConfig,
    ) -> Result<Self> {
        store.open().await?;

        let autosave = AutosaveController::new(storage.clone(), scheduler, config);
        let mut state = AppState::new();
        let snapshot = autosave.load()?;
        snapshot.restore_into(&mut state);

        let checkpoints = CheckpointManager::load(storage)?;
        info!(
            restored_fields = snapshot.len(),
            checkpoints = checkpoints.len(),
            "Session started"
        );

        Ok(Self {
            state: RwLock::new(state),
            autosave,
            checkpoints,
            lawyers: LawyerDirectory::new(store.clone()),
            jobs: JobApplications::new(store),
        })
    }

    /// A copy of the current state.
    pub fn state(&self) -> AppState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Applies `action` and schedules an autosave if it touched an
    /// autosaved field. Returns the new state.
    pub fn dispatch(&self, action: Action) -> AppState {
        let autosave = action.touches_autosaved_fields();
        let mut state = self.state_mut();
        let next = reduce(&state, action);
        *state = next;

        if autosave {
            self.autosave.schedule_save(AutoSaveSnapshot::capture(&state));
        }
        state.clone()
    }

    /// Writes the autosave snapshot right away.
    pub fn save_now(&self) -> Result<()> {
        let snapshot = AutoSaveSnapshot::capture(&self.state());
        self.autosave.save_now(&snapshot)
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    pub fn autosave(&self) -> &AutosaveController {
        &self.autosave
    }

    // ============================================================================
    // Checkpoints
    // ============================================================================

    pub fn create_checkpoint(&self, name: &str) -> Result<CheckpointSummary> {
        let state = serde_json::to_value(self.state())?;
        self.checkpoints.create(name, state)
    }

    /// Replaces the whole state with the one stored in checkpoint `id`.
    pub fn restore_checkpoint(&self, id: &str) -> Result<AppState> {
        let stored = self.checkpoints.restore(id)?;
        let state: AppState = serde_json::from_value(stored)
            .map_err(|e| LexdeskError::parse(format!("checkpoint {}", id), e.to_string()))?;

        info!(id, "Restoring checkpoint");
        Ok(self.dispatch(Action::Replace(Box::new(state))))
    }

    pub fn delete_checkpoint(&self, id: &str) -> Result<()> {
        self.checkpoints.delete(id)
    }

    pub fn checkpoints(&self) -> Vec<CheckpointSummary> {
        self.checkpoints.list()
    }

    // ============================================================================
    // Record store
    // ============================================================================

    /// Shows the results of a lawyer search and remembers them.
    pub async fn complete_lawyer_search(&self, results: Vec<LawyerRecord>) -> Result<usize> {
        let written = self.lawyers.record_search_results(&results).await?;
        self.dispatch(Action::LawyersFound(results));
        Ok(written)
    }

    /// Stores an application generated from the job assistant's current
    /// inputs and shows its outputs.
    pub async fn complete_application(
        &self,
        tailored_resume: String,
        cover_letter: String,
    ) -> Result<JobApplicationRecord> {
        let job = self.state().job;
        let record = self
            .jobs
            .generate(ApplicationDraft {
                job_title: job.job_title,
                company: job.company,
                job_url: job.job_url,
                cv_text: job.cv_text,
                job_description: job.job_description,
                tailored_resume,
                cover_letter,
            })
            .await?;

        self.dispatch(Action::ApplicationGenerated {
            application_id: record.id.clone(),
            tailored_resume: record.tailored_resume.clone(),
            cover_letter: record.cover_letter.clone(),
        });
        Ok(record)
    }

    pub fn lawyers(&self) -> &LawyerDirectory<S> {
        &self.lawyers
    }

    pub fn jobs(&self) -> &JobApplications<S> {
        &self.jobs
    }

    /// Stops the autosave timers. Edits not yet written are dropped.
    pub fn shutdown(&self) {
        self.autosave.shutdown();
        debug!("Session shut down");
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, AppState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
