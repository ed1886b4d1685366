//! The state transition function.

use super::action::Action;
use super::model::{
    AppState, ContractAnalysisState, EvidenceAnalysisState, ImageGenerationState,
    JobAssistantState, LawyerSearchState, ReportState, Tool,
};

/// Maps `(current state, action)` to the next state.
///
/// Pure: the input is left untouched. Each action only changes the slice of
/// the tool it belongs to.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();

    match action {
        Action::SelectTool(tool) => next.active_tool = tool,
        Action::SetLanguage(language) => next.language = language,
        Action::SetField { field, value } => field.write(&mut next, value),
        Action::SetContact(contact) => next.job.contact = contact,
        Action::ReportGenerated(text) => next.report.generated_report = Some(text),
        Action::LawyersFound(records) => next.lawyer_search.results = records,
        Action::ContractAnalyzed(text) => next.contract.analysis = Some(text),
        Action::EvidenceAnalyzed(text) => next.evidence.analysis = Some(text),
        Action::ImageGenerated(data_url) => next.image.image_data_url = Some(data_url),
        Action::ApplicationGenerated {
            application_id,
            tailored_resume,
            cover_letter,
        } => {
            next.job.active_application_id = Some(application_id);
            next.job.tailored_resume = tailored_resume;
            next.job.cover_letter = cover_letter;
        }
        Action::ResetTool(tool) => match tool {
            Tool::Report => next.report = ReportState::default(),
            Tool::LawyerSearch => next.lawyer_search = LawyerSearchState::default(),
            Tool::ContractAnalysis => next.contract = ContractAnalysisState::default(),
            Tool::EvidenceAnalysis => next.evidence = EvidenceAnalysisState::default(),
            Tool::ImageGeneration => next.image = ImageGenerationState::default(),
            Tool::JobAssistant => next.job = JobAssistantState::default(),
        },
        Action::Replace(state) => next = *state,
    }

    next
}
