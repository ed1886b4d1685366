//! Application state domain models.

use crate::lawyer::LawyerRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The tools offered by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    #[default]
    Report,
    LawyerSearch,
    ContractAnalysis,
    EvidenceAnalysis,
    ImageGeneration,
    JobAssistant,
}

impl Tool {
    pub const fn all() -> &'static [Tool] {
        &[
            Tool::Report,
            Tool::LawyerSearch,
            Tool::ContractAnalysis,
            Tool::EvidenceAnalysis,
            Tool::ImageGeneration,
            Tool::JobAssistant,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Tool::Report => "report",
            Tool::LawyerSearch => "lawyerSearch",
            Tool::ContractAnalysis => "contractAnalysis",
            Tool::EvidenceAnalysis => "evidenceAnalysis",
            Tool::ImageGeneration => "imageGeneration",
            Tool::JobAssistant => "jobAssistant",
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::all()
            .iter()
            .copied()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown tool: {}", s))
    }
}

/// Report drafting tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportState {
    pub title: String,
    pub case_facts: String,
    pub recipient: String,
    pub report_type: String,
    /// Generated output, never autosaved.
    pub generated_report: Option<String>,
}

/// Lawyer search tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LawyerSearchState {
    pub specialty: String,
    pub city: String,
    pub query: String,
    pub results: Vec<LawyerRecord>,
}

/// Contract analysis tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractAnalysisState {
    pub contract_text: String,
    pub focus: String,
    pub analysis: Option<String>,
}

/// Evidence analysis tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceAnalysisState {
    pub case_summary: String,
    pub evidence_description: String,
    pub analysis: Option<String>,
}

/// Image generation tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageGenerationState {
    pub prompt: String,
    pub style: String,
    /// Base64 data URL of the last generated image.
    pub image_data_url: Option<String>,
}

/// Contact block printed on generated resumes and cover letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDetails {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Job application assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobAssistantState {
    pub job_title: String,
    pub company: String,
    pub job_url: String,
    pub cv_text: String,
    pub job_description: String,
    pub contact: ContactDetails,
    pub tailored_resume: String,
    pub cover_letter: String,
    /// Id of the stored application the outputs belong to.
    pub active_application_id: Option<String>,
}

/// The full application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub active_tool: Tool,
    pub language: String,
    pub report: ReportState,
    pub lawyer_search: LawyerSearchState,
    pub contract: ContractAnalysisState,
    pub evidence: EvidenceAnalysisState,
    pub image: ImageGenerationState,
    pub job: JobAssistantState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
