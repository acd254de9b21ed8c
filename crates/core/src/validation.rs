//! Field-keyed validation errors.
//!
//! Every form and entity in this crate reports failures as a mapping from
//! field name to human-readable messages. Rules accumulate: a field can
//! carry several messages at once, and validation never stops at the first
//! failing field.

use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated validation errors, keyed by field name.
///
/// An empty map means the validated value is acceptable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure message against a field. Messages on the same field
    /// accumulate in the order they were added.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any message has been recorded against the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// All messages recorded against the given field.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(field, messages)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_by_default() {
        let errors = FieldErrors::new();
        assert!(errors.is_empty());
        assert!(!errors.contains("email"));
        assert!(errors.messages("email").is_empty());
    }

    #[test]
    fn messages_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("email", "is required");
        errors.add("email", "is not a valid email address");
        assert_eq!(
            errors.messages("email"),
            ["is required", "is not a valid email address"]
        );
    }

    #[test]
    fn serializes_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "is required");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "name": ["is required"] }));
    }
}
