//! Job applications produced by the job assistant.

use lexdesk_core::job_application::{
    ApplicationDraft, ChatMessage, ChatRole, ContentEdit, JobApplicationRecord, JobStatus,
};
use lexdesk_core::storage::RecordStore;
use lexdesk_core::{LexdeskError, Result, now_millis};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Service over the `jobApplications` collection.
///
/// Every mutation refreshes `last_updated`. Records are never deleted here.
pub struct JobApplications<S> {
    store: Arc<S>,
}

impl<S: RecordStore> JobApplications<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores a freshly generated application in `Draft` status.
    pub async fn generate(&self, draft: ApplicationDraft) -> Result<JobApplicationRecord> {
        let record = JobApplicationRecord {
            id: Uuid::new_v4().to_string(),
            job_title: draft.job_title,
            company: draft.company,
            job_url: draft.job_url,
            status: JobStatus::Draft,
            cv_text: draft.cv_text,
            job_description: draft.job_description,
            tailored_resume: draft.tailored_resume,
            cover_letter: draft.cover_letter,
            last_updated: now_millis(),
            applied_date: None,
            notes: None,
            chat_history: None,
        };

        self.store.insert_one(&record).await?;
        info!(id = %record.id, company = %record.company, "Stored generated application");
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Result<JobApplicationRecord> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| LexdeskError::not_found("job application", id))
    }

    /// Moves an application to `status`.
    ///
    /// The applied date is stamped the first time the status becomes
    /// `Applied` and kept through later transitions.
    pub async fn transition(&self, id: &str, status: JobStatus) -> Result<JobApplicationRecord> {
        self.modify(id, |record, now| {
            record.status = status;
            if status == JobStatus::Applied && record.applied_date.is_none() {
                record.applied_date = Some(now);
            }
        })
        .await
    }

    pub async fn edit_content(&self, id: &str, edit: ContentEdit) -> Result<JobApplicationRecord> {
        self.modify(id, |record, _| match edit {
            ContentEdit::TailoredResume(text) => record.tailored_resume = text,
            ContentEdit::CoverLetter(text) => record.cover_letter = text,
            ContentEdit::Notes(text) => record.notes = Some(text),
        })
        .await
    }

    /// Appends one message to the application's coaching chat.
    pub async fn append_chat(
        &self,
        id: &str,
        role: ChatRole,
        content: impl Into<String>,
    ) -> Result<JobApplicationRecord> {
        let content = content.into();
        self.modify(id, |record, now| {
            record
                .chat_history
                .get_or_insert_with(Vec::new)
                .push(ChatMessage {
                    role,
                    content,
                    timestamp: now,
                });
        })
        .await
    }

    /// Every application, most recently applied first.
    pub async fn list(&self) -> Result<Vec<JobApplicationRecord>> {
        self.store.get_all().await
    }

    /// Applies `f` to the stored record inside one store transaction.
    async fn modify<F>(&self, id: &str, f: F) -> Result<JobApplicationRecord>
    where
        F: FnOnce(&mut JobApplicationRecord, i64) + Send,
    {
        let now = now_millis();
        let record = self
            .store
            .modify(id, |record: &mut JobApplicationRecord| {
                f(record, now);
                record.last_updated = now;
                Ok(())
            })
            .await?
            .ok_or_else(|| LexdeskError::not_found("job application", id))?;

        debug!(id, status = %record.status, "Updated job application");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexdesk_infrastructure::{MemoryEngine, VersionedStore};

    async fn service() -> JobApplications<VersionedStore<MemoryEngine>> {
        let store = Arc::new(VersionedStore::new("test", 2, MemoryEngine::new()));
        store.open().await.unwrap();
        JobApplications::new(store)
    }

    fn draft(company: &str) -> ApplicationDraft {
        ApplicationDraft {
            job_title: "Legal Counsel".to_string(),
            company: company.to_string(),
            tailored_resume: "Resume".to_string(),
            cover_letter: "Letter".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_creates_draft() {
        let jobs = service().await;
        let record = jobs.generate(draft("Acme")).await.unwrap();

        assert_eq!(record.status, JobStatus::Draft);
        assert!(record.applied_date.is_none());
        assert!(record.last_updated > 0);
        assert_eq!(jobs.get(&record.id).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_applied_date_set_once() {
        let jobs = service().await;
        let record = jobs.generate(draft("Acme")).await.unwrap();

        let applied = jobs.transition(&record.id, JobStatus::Applied).await.unwrap();
        let stamped = applied.applied_date.expect("applied date should be set");

        let interviewing = jobs
            .transition(&record.id, JobStatus::Interviewing)
            .await
            .unwrap();
        assert_eq!(interviewing.applied_date, Some(stamped));

        let reapplied = jobs.transition(&record.id, JobStatus::Applied).await.unwrap();
        assert_eq!(reapplied.applied_date, Some(stamped));
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let jobs = service().await;
        let err = jobs
            .transition("missing", JobStatus::Offer)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_edit_content_and_chat() {
        let jobs = service().await;
        let record = jobs.generate(draft("Acme")).await.unwrap();

        jobs.edit_content(&record.id, ContentEdit::CoverLetter("Dear Acme".into()))
            .await
            .unwrap();
        jobs.edit_content(&record.id, ContentEdit::Notes("Call back Monday".into()))
            .await
            .unwrap();
        jobs.append_chat(&record.id, ChatRole::User, "How do I open?")
            .await
            .unwrap();
        let updated = jobs
            .append_chat(&record.id, ChatRole::Assistant, "Lead with the merger work.")
            .await
            .unwrap();

        assert_eq!(updated.cover_letter, "Dear Acme");
        assert_eq!(updated.notes.as_deref(), Some("Call back Monday"));
        let chat = updated.chat_history.unwrap();
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[1].role, ChatRole::Assistant);
    }

    #[tokio::test]
    async fn test_list_orders_by_applied_date() {
        let jobs = service().await;
        let never = jobs.generate(draft("Never")).await.unwrap();
        let first = jobs.generate(draft("First")).await.unwrap();
        let second = jobs.generate(draft("Second")).await.unwrap();

        jobs.transition(&first.id, JobStatus::Applied).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        jobs.transition(&second.id, JobStatus::Applied).await.unwrap();

        let ids: Vec<_> = jobs.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id, never.id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_chat_appends_are_all_kept() {
        let jobs = Arc::new(service().await);
        let record = jobs.generate(draft("Acme")).await.unwrap();

        let appends: Vec<_> = (0..50)
            .map(|i| {
                let jobs = Arc::clone(&jobs);
                let id = record.id.clone();
                tokio::spawn(async move {
                    jobs.append_chat(&id, ChatRole::User, format!("m{}", i)).await
                })
            })
            .collect();
        for append in futures::future::join_all(appends).await {
            append.unwrap().unwrap();
        }

        let stored = jobs.get(&record.id).await.unwrap();
        assert_eq!(stored.chat_history.unwrap().len(), 50);
    }
}
