//! Application state and its transitions.
//!
//! The whole UI is one `AppState`. Tools change it only through `reduce`,
//! and the persistence layers treat it as an opaque serializable value.

pub mod action;
pub mod model;
pub mod reducer;

pub use action::{Action, FormField};
pub use model::{
    AppState, ContactDetails, ContractAnalysisState, EvidenceAnalysisState, ImageGenerationState,
    JobAssistantState, LawyerSearchState, ReportState, Tool,
};
pub use reducer::reduce;
