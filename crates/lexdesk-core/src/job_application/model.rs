//! Job application domain model.
//!
//! A job application is created when the job assistant generates a tailored
//! resume and cover letter, then moves through statuses as the user applies
//! and hears back. Records are never hard-deleted by the assistant.

use crate::storage::{Collection, Record};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where an application stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Generated but not yet sent.
    #[default]
    Draft,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    /// The user pulled out of the process.
    Withdrawn,
}

impl JobStatus {
    pub const fn all() -> &'static [JobStatus] {
        &[
            JobStatus::Draft,
            JobStatus::Applied,
            JobStatus::Interviewing,
            JobStatus::Offer,
            JobStatus::Rejected,
            JobStatus::Withdrawn,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Withdrawn => "withdrawn",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::all()
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown job status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the per-application coaching chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// A persisted job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationRecord {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub job_url: String,
    pub status: JobStatus,
    pub cv_text: String,
    pub job_description: String,
    pub tailored_resume: String,
    pub cover_letter: String,
    /// Epoch milliseconds of the last mutation.
    pub last_updated: i64,
    /// Epoch milliseconds of the first transition to `Applied`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<Vec<ChatMessage>>,
}

impl Record for JobApplicationRecord {
    const COLLECTION: Collection = Collection::JobApplications;

    /// Most recently applied first; applications never sent sort last.
    fn sort_for_listing(records: &mut [Self]) {
        records.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
    }
}

/// Input of the "generate application" action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub job_title: String,
    pub company: String,
    pub job_url: String,
    pub cv_text: String,
    pub job_description: String,
    pub tailored_resume: String,
    pub cover_letter: String,
}

/// A content edit applied to an existing application.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEdit {
    TailoredResume(String),
    CoverLetter(String),
    Notes(String),
}
