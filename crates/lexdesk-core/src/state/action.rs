//! State transitions dispatched by the tools.

use super::model::{AppState, ContactDetails, Tool};
use crate::lawyer::LawyerRecord;

/// A free-text input field of one of the tools.
///
/// `name()` is the field's identifier in the autosave snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ReportTitle,
    ReportCaseFacts,
    ReportRecipient,
    ReportType,
    LawyerSpecialty,
    LawyerCity,
    LawyerQuery,
    ContractText,
    ContractFocus,
    EvidenceCaseSummary,
    EvidenceDescription,
    ImagePrompt,
    ImageStyle,
    JobTitle,
    JobCompany,
    JobUrl,
    JobCvText,
    JobDescription,
}

impl FormField {
    pub const fn all() -> &'static [FormField] {
        &[
            FormField::ReportTitle,
            FormField::ReportCaseFacts,
            FormField::ReportRecipient,
            FormField::ReportType,
            FormField::LawyerSpecialty,
            FormField::LawyerCity,
            FormField::LawyerQuery,
            FormField::ContractText,
            FormField::ContractFocus,
            FormField::EvidenceCaseSummary,
            FormField::EvidenceDescription,
            FormField::ImagePrompt,
            FormField::ImageStyle,
            FormField::JobTitle,
            FormField::JobCompany,
            FormField::JobUrl,
            FormField::JobCvText,
            FormField::JobDescription,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            FormField::ReportTitle => "report.title",
            FormField::ReportCaseFacts => "report.caseFacts",
            FormField::ReportRecipient => "report.recipient",
            FormField::ReportType => "report.reportType",
            FormField::LawyerSpecialty => "lawyerSearch.specialty",
            FormField::LawyerCity => "lawyerSearch.city",
            FormField::LawyerQuery => "lawyerSearch.query",
            FormField::ContractText => "contract.contractText",
            FormField::ContractFocus => "contract.focus",
            FormField::EvidenceCaseSummary => "evidence.caseSummary",
            FormField::EvidenceDescription => "evidence.evidenceDescription",
            FormField::ImagePrompt => "image.prompt",
            FormField::ImageStyle => "image.style",
            FormField::JobTitle => "job.jobTitle",
            FormField::JobCompany => "job.company",
            FormField::JobUrl => "job.jobUrl",
            FormField::JobCvText => "job.cvText",
            FormField::JobDescription => "job.jobDescription",
        }
    }

    pub fn from_name(name: &str) -> Option<FormField> {
        FormField::all().iter().copied().find(|f| f.name() == name)
    }

    /// The tool whose slice owns this field.
    pub const fn tool(&self) -> Tool {
        match self {
            FormField::ReportTitle
            | FormField::ReportCaseFacts
            | FormField::ReportRecipient
            | FormField::ReportType => Tool::Report,
            FormField::LawyerSpecialty | FormField::LawyerCity | FormField::LawyerQuery => {
                Tool::LawyerSearch
            }
            FormField::ContractText | FormField::ContractFocus => Tool::ContractAnalysis,
            FormField::EvidenceCaseSummary | FormField::EvidenceDescription => {
                Tool::EvidenceAnalysis
            }
            FormField::ImagePrompt | FormField::ImageStyle => Tool::ImageGeneration,
            FormField::JobTitle
            | FormField::JobCompany
            | FormField::JobUrl
            | FormField::JobCvText
            | FormField::JobDescription => Tool::JobAssistant,
        }
    }

    pub fn read<'a>(&self, state: &'a AppState) -> &'a str {
        match self {
            FormField::ReportTitle => &state.report.title,
            FormField::ReportCaseFacts => &state.report.case_facts,
            FormField::ReportRecipient => &state.report.recipient,
            FormField::ReportType => &state.report.report_type,
            FormField::LawyerSpecialty => &state.lawyer_search.specialty,
            FormField::LawyerCity => &state.lawyer_search.city,
            FormField::LawyerQuery => &state.lawyer_search.query,
            FormField::ContractText => &state.contract.contract_text,
            FormField::ContractFocus => &state.contract.focus,
            FormField::EvidenceCaseSummary => &state.evidence.case_summary,
            FormField::EvidenceDescription => &state.evidence.evidence_description,
            FormField::ImagePrompt => &state.image.prompt,
            FormField::ImageStyle => &state.image.style,
            FormField::JobTitle => &state.job.job_title,
            FormField::JobCompany => &state.job.company,
            FormField::JobUrl => &state.job.job_url,
            FormField::JobCvText => &state.job.cv_text,
            FormField::JobDescription => &state.job.job_description,
        }
    }

    pub fn write(&self, state: &mut AppState, value: String) {
        let slot = match self {
            FormField::ReportTitle => &mut state.report.title,
            FormField::ReportCaseFacts => &mut state.report.case_facts,
            FormField::ReportRecipient => &mut state.report.recipient,
            FormField::ReportType => &mut state.report.report_type,
            FormField::LawyerSpecialty => &mut state.lawyer_search.specialty,
            FormField::LawyerCity => &mut state.lawyer_search.city,
            FormField::LawyerQuery => &mut state.lawyer_search.query,
            FormField::ContractText => &mut state.contract.contract_text,
            FormField::ContractFocus => &mut state.contract.focus,
            FormField::EvidenceCaseSummary => &mut state.evidence.case_summary,
            FormField::EvidenceDescription => &mut state.evidence.evidence_description,
            FormField::ImagePrompt => &mut state.image.prompt,
            FormField::ImageStyle => &mut state.image.style,
            FormField::JobTitle => &mut state.job.job_title,
            FormField::JobCompany => &mut state.job.company,
            FormField::JobUrl => &mut state.job.job_url,
            FormField::JobCvText => &mut state.job.cv_text,
            FormField::JobDescription => &mut state.job.job_description,
        };
        *slot = value;
    }
}

/// Everything that can change the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTool(Tool),
    SetLanguage(String),
    /// An edit of one free-text input.
    SetField { field: FormField, value: String },
    SetContact(ContactDetails),
    ReportGenerated(String),
    LawyersFound(Vec<LawyerRecord>),
    ContractAnalyzed(String),
    EvidenceAnalyzed(String),
    ImageGenerated(String),
    ApplicationGenerated {
        application_id: String,
        tailored_resume: String,
        cover_letter: String,
    },
    /// Clears the outputs and inputs of one tool.
    ResetTool(Tool),
    /// Replaces the whole state, e.g. when a checkpoint is restored.
    Replace(Box<AppState>),
}

impl Action {
    /// Whether the action can change a field covered by the autosave snapshot.
    pub fn touches_autosaved_fields(&self) -> bool {
        matches!(
            self,
            Action::SetField { .. }
                | Action::SetContact(_)
                | Action::ResetTool(_)
                | Action::Replace(_)
        )
    }
}
