//! Debounced autosave of in-progress form inputs.
//!
//! Every edit calls [`AutosaveController::schedule_save`]; edits that arrive
//! within the quiet interval coalesce into a single write carrying the
//! latest snapshot. The debounced write runs on the blocking pool; the status
//! goes `Saving` then `Saved` (or `Failed`) and reverts to `Idle` after the
//! display delay.

use crate::scheduler::{ScheduledTask, Scheduler};
use futures::FutureExt;
use lexdesk_core::Result;
use lexdesk_core::autosave::{AutoSaveSnapshot, SaveStatus};
use lexdesk_core::config::AutosaveConfig;
use lexdesk_core::storage::{AUTOSAVE_KEY, KeyValueStorage};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Owns the pending autosave timer and the status indicator.
///
/// Cloning is cheap; clones drive the same timer.
#[derive(Clone)]
pub struct AutosaveController {
    inner: Arc<Inner>,
}

struct Inner {
    storage: Arc<dyn KeyValueStorage>,
    scheduler: Arc<dyn Scheduler>,
    debounce: Duration,
    saved_display: Duration,
    /// The scheduled write, if one is waiting for the quiet interval.
    pending: Mutex<Option<ScheduledTask>>,
    /// The scheduled `Saved`/`Failed` → `Idle` revert.
    revert: Mutex<Option<ScheduledTask>>,
    status: watch::Sender<SaveStatus>,
}

impl AutosaveController {
    pub fn new(
        storage: Arc<dyn KeyValueStorage>,
        scheduler: Arc<dyn Scheduler>,
        config: &AutosaveConfig,
    ) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                storage,
                scheduler,
                debounce: config.debounce(),
                saved_display: config.saved_display(),
                pending: Mutex::new(None),
                revert: Mutex::new(None),
                status,
            }),
        }
    }

    /// Reads the persisted snapshot.
    ///
    /// A missing value yields an empty snapshot. A value that is not valid
    /// JSON is logged and treated as no prior state. Read failures of the
    /// storage itself are returned.
    pub fn load(&self) -> Result<AutoSaveSnapshot> {
        let Some(raw) = self.inner.storage.get(AUTOSAVE_KEY)? else {
            debug!("No autosave snapshot found");
            return Ok(AutoSaveSnapshot::new());
        };

        match serde_json::from_str::<AutoSaveSnapshot>(&raw) {
            Ok(snapshot) => {
                let snapshot = snapshot.retain_known_fields();
                debug!(fields = snapshot.len(), "Loaded autosave snapshot");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable autosave snapshot");
                Ok(AutoSaveSnapshot::new())
            }
        }
    }

    /// Schedules a write of `snapshot` after the quiet interval, replacing
    /// any write that has not fired yet.
    pub fn schedule_save(&self, snapshot: AutoSaveSnapshot) {
        let mut pending = lock(&self.inner.pending);
        if let Some(previous) = pending.take() {
            previous.cancel();
        }

        let inner = Arc::clone(&self.inner);
        let task = self.inner.scheduler.schedule(
            self.inner.debounce,
            async move {
                // Failures are reported through the status only.
                let writer = Arc::clone(&inner);
                let written = tokio::task::spawn_blocking(move || writer.write(&snapshot)).await;
                if let Err(e) = written {
                    warn!(error = %e, "Autosave task did not complete");
                    inner.settle(SaveStatus::Failed);
                }
            }
            .boxed(),
        );
        *pending = Some(task);
    }

    /// Writes `snapshot` immediately on the calling thread, dropping any
    /// pending write.
    ///
    /// Unlike the debounced path, a failed write is returned to the caller.
    pub fn save_now(&self, snapshot: &AutoSaveSnapshot) -> Result<()> {
        self.cancel_pending();
        self.inner.write(snapshot)
    }

    /// Whether a write is waiting for its quiet interval to elapse.
    pub fn has_pending(&self) -> bool {
        lock(&self.inner.pending)
            .as_ref()
            .is_some_and(|task| !task.has_fired() && !task.is_cancelled())
    }

    pub fn status(&self) -> SaveStatus {
        *self.inner.status.borrow()
    }

    /// Receiver that observes every status change.
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.inner.status.subscribe()
    }

    /// Cancels every timer the controller owns.
    ///
    /// A write that already fired runs to completion.
    pub fn shutdown(&self) {
        if self.cancel_pending() {
            debug!("Cancelled pending autosave on shutdown");
        }
        if let Some(revert) = lock(&self.inner.revert).take() {
            revert.cancel();
        }
    }

    fn cancel_pending(&self) -> bool {
        lock(&self.inner.pending)
            .take()
            .is_some_and(|task| task.cancel())
    }
}

impl Inner {
    fn write(self: &Arc<Self>, snapshot: &AutoSaveSnapshot) -> Result<()> {
        if let Some(revert) = lock(&self.revert).take() {
            revert.cancel();
        }
        self.status.send_replace(SaveStatus::Saving);

        let result = serde_json::to_string(snapshot)
            .map_err(Into::into)
            .and_then(|json| self.storage.set(AUTOSAVE_KEY, &json));

        match &result {
            Ok(()) => {
                debug!(fields = snapshot.len(), "Autosave written");
                self.settle(SaveStatus::Saved);
            }
            Err(e) => {
                warn!(error = %e, "Autosave failed; previous copy left in place");
                self.settle(SaveStatus::Failed);
            }
        }
        result
    }

    /// Publishes a final status and schedules its revert to `Idle`.
    fn settle(self: &Arc<Self>, status: SaveStatus) {
        self.status.send_replace(status);

        let inner = Arc::clone(self);
        let task = self.scheduler.schedule(
            self.saved_display,
            async move {
                inner.status.send_if_modified(|current| {
                    if *current == status {
                        *current = SaveStatus::Idle;
                        true
                    } else {
                        false
                    }
                });
            }
            .boxed(),
        );
        *lock(&self.revert) = Some(task);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
