//! Contact form submissions.
//!
//! A thin validation wrapper: all five fields are required, nothing is
//! persisted. A valid submission is handed to the mail notifier by the
//! HTTP layer.

use serde_json::Value;

use crate::validation::FieldErrors;

/// A single contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name_kanji: String,
    pub name_kana: String,
    pub email: String,
    pub affiliation: String,
    pub body: String,
}

impl ContactSubmission {
    /// Build a submission from an untrusted key/value map. Unknown keys and
    /// non-string values are silently ignored.
    pub fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut submission = Self::default();
        for (key, value) in map {
            let slot = match key.as_str() {
                "name_kanji" => &mut submission.name_kanji,
                "name_kana" => &mut submission.name_kana,
                "email" => &mut submission.email,
                "affiliation" => &mut submission.affiliation,
                "body" => &mut submission.body,
                _ => continue,
            };
            if let Some(s) = value.as_str() {
                *slot = s.to_string();
            }
        }
        submission
    }

    /// Every field is required; errors accumulate per field.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let fields: [(&str, &str); 5] = [
            ("name_kanji", &self.name_kanji),
            ("name_kana", &self.name_kana),
            ("email", &self.email),
            ("affiliation", &self.affiliation),
            ("body", &self.body),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                errors.add(field, "is required");
            }
        }
        errors
    }
}
