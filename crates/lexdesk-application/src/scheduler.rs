//! Cancellable, fire-once scheduled tasks.
//!
//! The autosave controller only talks to the [`Scheduler`] trait, so the
//! timer primitive can be swapped. [`TokioScheduler`] runs on tokio's clock,
//! which tests pause and advance by hand.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs a future once after a delay unless cancelled first.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> ScheduledTask;
}

/// Handle to a scheduled task.
///
/// Cancelling only has an effect until the task fires; once it has fired it
/// runs to completion.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl ScheduledTask {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Cancels the task. Returns `true` if it had not fired yet.
    pub fn cancel(&self) -> bool {
        self.token.cancel();
        !self.has_fired()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Scheduler backed by `tokio::time::sleep` on the current runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> ScheduledTask {
        let handle = ScheduledTask::new();
        let token = handle.token.clone();
        let fired = Arc::clone(&handle.fired);

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            if token.is_cancelled() {
                return;
            }
            fired.store(true, Ordering::SeqCst);
            task.await;
        });

        handle
    }
}
