//! The autosave snapshot and the fields it covers.
//!
//! Only the fields named in [`AUTOSAVE_FIELDS`] are persisted. Generated
//! results, images and other derived content stay out even when they are
//! plain strings, and so does the UI language.

use crate::state::{AppState, ContactDetails, FormField};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the nested contact block in the snapshot.
const JOB_CONTACT: &str = "job.contact";

/// Every field the autosave snapshot captures and restores.
pub const AUTOSAVE_FIELDS: &[&str] = &[
    "report.title",
    "report.caseFacts",
    "report.recipient",
    "report.reportType",
    "lawyerSearch.specialty",
    "lawyerSearch.city",
    "lawyerSearch.query",
    "contract.contractText",
    "contract.focus",
    "evidence.caseSummary",
    "evidence.evidenceDescription",
    "image.prompt",
    "image.style",
    "job.jobTitle",
    "job.company",
    "job.jobUrl",
    "job.cvText",
    "job.jobDescription",
    JOB_CONTACT,
];

/// A snapshot value: a string, or a small object with fixed string fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Group(BTreeMap<String, String>),
}

/// Flat mapping of form-field name to its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoSaveSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl AutoSaveSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every autosaved field out of the application state.
    pub fn capture(state: &AppState) -> Self {
        let mut fields = BTreeMap::new();
        for name in AUTOSAVE_FIELDS {
            if let Some(value) = read_field(state, name) {
                fields.insert((*name).to_string(), value);
            }
        }
        Self { fields }
    }

    /// Writes the captured fields back into `state`.
    ///
    /// Fields outside [`AUTOSAVE_FIELDS`] and values of the wrong shape are
    /// ignored, so a snapshot written by another version never clobbers
    /// generated content.
    pub fn restore_into(&self, state: &mut AppState) {
        for (name, value) in &self.fields {
            match (name.as_str(), value) {
                (JOB_CONTACT, FieldValue::Group(group)) => {
                    state.job.contact = contact_from_group(group);
                }
                (name, FieldValue::Text(text)) => {
                    if let Some(field) = FormField::from_name(name) {
                        if AUTOSAVE_FIELDS.contains(&name) {
                            field.write(state, text.clone());
                        }
                    }
                }
                // Mis-shaped value.
                _ => {}
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Drops every entry that is not an autosaved field.
    pub fn retain_known_fields(mut self) -> Self {
        self.fields
            .retain(|name, _| AUTOSAVE_FIELDS.contains(&name.as_str()));
        self
    }
}

fn read_field(state: &AppState, name: &str) -> Option<FieldValue> {
    if name == JOB_CONTACT {
        return Some(FieldValue::Group(contact_to_group(&state.job.contact)));
    }
    FormField::from_name(name).map(|field| FieldValue::Text(field.read(state).to_string()))
}

fn contact_to_group(contact: &ContactDetails) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("fullName".to_string(), contact.full_name.clone()),
        ("email".to_string(), contact.email.clone()),
        ("phone".to_string(), contact.phone.clone()),
    ])
}

fn contact_from_group(group: &BTreeMap<String, String>) -> ContactDetails {
    let field = |key: &str| group.get(key).cloned().unwrap_or_default();
    ContactDetails {
        full_name: field("fullName"),
        email: field("email"),
        phone: field("phone"),
    }
}

/// Status of the autosave indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    /// The last write failed; the previous persisted copy is still in place.
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tool;

    fn edited_state() -> AppState {
        let mut state = AppState::new();
        state.report.title = "Wrongful dismissal".to_string();
        state.report.generated_report = Some("Long generated report".to_string());
        state.image.image_data_url = Some("data:image/png;base64,AAAA".to_string());
        state.job.company = "Acme".to_string();
        state.job.tailored_resume = "Generated resume".to_string();
        state.job.contact.email = "sam@example.test".to_string();
        state.language = "fr".to_string();
        state.active_tool = Tool::JobAssistant;
        state
    }

    #[test]
    fn test_capture_covers_exactly_the_field_list() {
        let snapshot = AutoSaveSnapshot::capture(&edited_state());
        assert_eq!(snapshot.len(), AUTOSAVE_FIELDS.len());
        for name in AUTOSAVE_FIELDS {
            assert!(snapshot.get(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_capture_excludes_generated_content() {
        let snapshot = AutoSaveSnapshot::capture(&edited_state());
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("Long generated report"));
        assert!(!json.contains("Generated resume"));
        assert!(!json.contains("base64"));
        assert!(snapshot.get("language").is_none());
    }

    #[test]
    fn test_restore_round_trip() {
        let original = edited_state();
        let snapshot = AutoSaveSnapshot::capture(&original);

        let json = serde_json::to_string(&snapshot).unwrap();
        let loaded: AutoSaveSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, snapshot);

        let mut restored = AppState::new();
        loaded.restore_into(&mut restored);
        assert_eq!(restored.report.title, "Wrongful dismissal");
        assert_eq!(restored.job.company, "Acme");
        assert_eq!(restored.job.contact.email, "sam@example.test");
        assert!(restored.report.generated_report.is_none());
        assert!(restored.job.tailored_resume.is_empty());
    }

    #[test]
    fn test_restore_ignores_unknown_and_mis_shaped_fields() {
        let json = r#"{
            "report.title": "Kept",
            "report.generatedReport": "Should not load",
            "job.company": { "name": "wrong shape" },
            "job.contact": "wrong shape"
        }"#;
        let snapshot: AutoSaveSnapshot = serde_json::from_str(json).unwrap();

        let mut state = AppState::new();
        snapshot.restore_into(&mut state);
        assert_eq!(state.report.title, "Kept");
        assert!(state.report.generated_report.is_none());
        assert!(state.job.company.is_empty());
        assert_eq!(state.job.contact, ContactDetails::default());
    }

    #[test]
    fn test_retain_known_fields() {
        let json = r#"{ "report.title": "A", "legacy.field": "B" }"#;
        let snapshot: AutoSaveSnapshot = serde_json::from_str(json).unwrap();
        let cleaned = snapshot.retain_known_fields();
        assert_eq!(cleaned.len(), 1);
        assert!(cleaned.get("legacy.field").is_none());
    }

    #[test]
    fn test_field_list_matches_form_fields() {
        for field in FormField::all() {
            assert!(AUTOSAVE_FIELDS.contains(&field.name()), "{}", field.name());
        }
    }
}
