//! Lawyers remembered from past searches.

use lexdesk_core::Result;
use lexdesk_core::lawyer::LawyerRecord;
use lexdesk_core::storage::{Collection, RecordStore};
use std::sync::Arc;
use tracing::debug;

/// Service over the `lawyers` collection, keyed by website.
pub struct LawyerDirectory<S> {
    store: Arc<S>,
}

impl<S: RecordStore> LawyerDirectory<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores the results of one search in a single batch.
    ///
    /// A lawyer found again replaces the earlier entry. Returns the number of
    /// records written.
    pub async fn record_search_results(&self, records: &[LawyerRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.store.upsert_many(records).await?;
        debug!(count = records.len(), "Recorded lawyer search results");
        Ok(records.len())
    }

    pub async fn all(&self) -> Result<Vec<LawyerRecord>> {
        self.store.get_all().await
    }

    pub async fn forget_all(&self) -> Result<()> {
        self.store.clear(Collection::Lawyers).await
    }
}
