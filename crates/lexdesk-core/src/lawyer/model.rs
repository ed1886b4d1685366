//! Lawyer domain model.

use crate::storage::{Collection, Record};
use serde::{Deserialize, Serialize};

/// A lawyer returned by the lawyer search tool.
///
/// The website is the natural key: searching again for the same firm
/// overwrites the previous entry instead of adding a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawyerRecord {
    pub website: String,
    pub name: String,
    pub specialty: String,
    pub city: String,
    pub contact_info: String,
    pub address: String,
    pub website_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years_of_experience: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LawyerRecord {
    /// Creates a record with the required fields and no optional details.
    pub fn new(website: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            website: website.into(),
            name: name.into(),
            specialty: String::new(),
            city: String::new(),
            contact_info: String::new(),
            address: String::new(),
            website_title: String::new(),
            relevance_score: None,
            years_of_experience: None,
            notes: None,
        }
    }
}

impl Record for LawyerRecord {
    const COLLECTION: Collection = Collection::Lawyers;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_and_skips_empty_optionals() {
        let mut lawyer = LawyerRecord::new("https://example-law.test", "Example Law");
        lawyer.website_title = "Example Law | Home".to_string();

        let value = serde_json::to_value(&lawyer).unwrap();
        assert_eq!(value["website"], "https://example-law.test");
        assert_eq!(value["websiteTitle"], "Example Law | Home");
        assert!(value.get("relevanceScore").is_none());
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_deserializes_without_optional_fields() {
        let json = r#"{
            "website": "https://a.test",
            "name": "A",
            "specialty": "Labour law",
            "city": "Lyon",
            "contactInfo": "+33 1 23",
            "address": "1 rue A",
            "websiteTitle": "A"
        }"#;
        let lawyer: LawyerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(lawyer.specialty, "Labour law");
        assert!(lawyer.years_of_experience.is_none());
    }
}
