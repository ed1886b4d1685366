//! End-to-end behavior of the application session.

use lexdesk_application::{AppSession, TokioScheduler, start_file_session};
use lexdesk_core::autosave::{AutoSaveSnapshot, SaveStatus};
use lexdesk_core::config::{AutosaveConfig, LexdeskConfig};
use lexdesk_core::job_application::JobStatus;
use lexdesk_core::lawyer::LawyerRecord;
use lexdesk_core::state::{Action, ContactDetails, FormField, Tool};
use lexdesk_core::storage::{AUTOSAVE_KEY, KeyValueStorage};
use lexdesk_infrastructure::{MemoryEngine, MemoryKeyValueStorage, VersionedStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

type MemorySession = AppSession<VersionedStore<MemoryEngine>>;

async fn memory_session(storage: &Arc<MemoryKeyValueStorage>) -> MemorySession {
    let store = Arc::new(VersionedStore::new("test", 2, MemoryEngine::new()));
    AppSession::start(
        store,
        storage.clone(),
        Arc::new(TokioScheduler),
        &AutosaveConfig::default(),
    )
    .await
    .unwrap()
}

fn set(field: FormField, value: &str) -> Action {
    Action::SetField {
        field,
        value: value.to_string(),
    }
}

fn file_config(dir: &TempDir) -> LexdeskConfig {
    LexdeskConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_restore_checkpoint_replaces_state_and_autosaves() {
    let storage = Arc::new(MemoryKeyValueStorage::new());
    let session = memory_session(&storage).await;

    session.dispatch(set(FormField::ReportTitle, "S1"));
    let checkpoint = session.create_checkpoint("Before rewrite").unwrap();
    session.dispatch(set(FormField::ReportTitle, "S2"));
    session.dispatch(Action::ReportGenerated("Generated for S2".to_string()));

    let restored = session.restore_checkpoint(&checkpoint.id).unwrap();
    assert_eq!(restored.report.title, "S1");
    assert!(restored.report.generated_report.is_none());
    assert_eq!(session.state(), restored);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(storage.write_count(), 2);
    assert_eq!(session.save_status(), SaveStatus::Saved);

    let raw = storage.get(AUTOSAVE_KEY).unwrap().unwrap();
    let snapshot: AutoSaveSnapshot = serde_json::from_str(&raw).unwrap();
    let mut state = lexdesk_core::state::AppState::new();
    snapshot.restore_into(&mut state);
    assert_eq!(state.report.title, "S1");
}

#[tokio::test(start_paused = true)]
async fn test_only_form_edits_schedule_autosave() {
    let storage = Arc::new(MemoryKeyValueStorage::new());
    let session = memory_session(&storage).await;

    session.dispatch(Action::SelectTool(Tool::ImageGeneration));
    session.dispatch(Action::ImageGenerated("data:image/png;base64,AAAA".into()));
    assert!(!session.autosave().has_pending());

    session.dispatch(set(FormField::ImagePrompt, "Courtroom at dawn"));
    assert!(session.autosave().has_pending());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(storage.write_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_drops_pending_edit() {
    let storage = Arc::new(MemoryKeyValueStorage::new());
    let session = memory_session(&storage).await;

    session.dispatch(set(FormField::ContractText, "Clause 4"));
    session.shutdown();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(storage.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_restore_of_deleted_checkpoint_is_not_found() {
    let storage = Arc::new(MemoryKeyValueStorage::new());
    let session = memory_session(&storage).await;

    let checkpoint = session.create_checkpoint("Gone").unwrap();
    session.delete_checkpoint(&checkpoint.id).unwrap();
    session.delete_checkpoint(&checkpoint.id).unwrap();

    let err = session.restore_checkpoint(&checkpoint.id).unwrap_err();
    assert!(err.is_not_found());
    assert!(session.checkpoints().is_empty());
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let session = start_file_session(&config).await.unwrap();
    session.dispatch(set(FormField::JobCompany, "Acme Legal"));
    session.dispatch(set(FormField::JobCvText, "Ten years of litigation"));
    session.dispatch(Action::SetContact(ContactDetails {
        full_name: "Sam Doe".to_string(),
        email: "sam@example.test".to_string(),
        phone: String::new(),
    }));
    session.save_now().unwrap();

    let record = session
        .complete_application("Tailored".to_string(), "Dear Acme".to_string())
        .await
        .unwrap();
    session
        .jobs()
        .transition(&record.id, JobStatus::Applied)
        .await
        .unwrap();
    session
        .complete_lawyer_search(vec![LawyerRecord::new("https://a.example", "Alice")])
        .await
        .unwrap();
    session.create_checkpoint("Applied to Acme").unwrap();
    session.shutdown();
    drop(session);

    let reopened = start_file_session(&config).await.unwrap();
    let state = reopened.state();
    assert_eq!(state.job.company, "Acme Legal");
    assert_eq!(state.job.contact.full_name, "Sam Doe");
    // Generated outputs are not part of the autosave.
    assert!(state.job.tailored_resume.is_empty());
    assert!(state.job.active_application_id.is_none());

    let jobs = reopened.jobs().list().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].company, "Acme Legal");
    assert_eq!(jobs[0].status, JobStatus::Applied);
    assert!(jobs[0].applied_date.is_some());

    assert_eq!(reopened.lawyers().all().await.unwrap().len(), 1);
    assert_eq!(reopened.checkpoints()[0].name, "Applied to Acme");
    reopened.shutdown();
}

#[tokio::test]
async fn test_file_session_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);
    config.store.name = "  ".to_string();

    let err = start_file_session(&config).await.err().unwrap();
    assert!(matches!(err, lexdesk_core::LexdeskError::Config(_)));
}

#[tokio::test]
async fn test_file_session_starts_over_corrupt_local_storage() {
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);
    std::fs::write(
        dir.path().join("local_storage.json"),
        r#"{ "lexdesk.autosave": "{\"report.title\": \"Tru"#,
    )
    .unwrap();

    let session = start_file_session(&config).await.unwrap();
    assert_eq!(session.state(), lexdesk_core::state::AppState::new());
    assert!(session.checkpoints().is_empty());

    session.dispatch(set(FormField::ReportTitle, "Recovered"));
    session.save_now().unwrap();
    session.create_checkpoint("After recovery").unwrap();
    session.shutdown();
    let quarantined = std::fs::read_dir(dir.path()).unwrap().any(|entry| {
        entry
            .unwrap()
            .file_name()
            .to_string_lossy()
            .starts_with("local_storage.json.corrupt-")
    });
    assert!(quarantined);
    drop(session);

    let reopened = start_file_session(&config).await.unwrap();
    assert_eq!(reopened.state().report.title, "Recovered");
    assert_eq!(reopened.checkpoints().len(), 1);
    reopened.shutdown();
}
