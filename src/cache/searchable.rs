//! Canonical searchable-text construction.
//!
//! Two logically identical schemas must embed to textually identical input
//! regardless of the order their keys were inserted in; anything else makes
//! cache hits depend on serialization accidents. The schema is therefore
//! rendered as JSON with sorted keys (structural, via `BTreeMap`).

use std::collections::BTreeMap;

/// Builds the text that gets embedded for an entry.
///
/// Only the description and the input schema participate; insights and
/// config are stored but never embedded.
pub fn build_searchable_text(description: &str, input_schema: &BTreeMap<String, String>) -> String {
    let schema_text =
        serde_json::to_string_pretty(input_schema).unwrap_or_else(|_| "{}".to_string());

    format!("Description: {description}\n\nInput Schema:\n{schema_text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let mut schema = BTreeMap::new();
        schema.insert("pdf_data".to_string(), "base64_large".to_string());

        let text = build_searchable_text("Extract text from PDF", &schema);

        assert!(text.starts_with("Description: Extract text from PDF\n\nInput Schema:\n"));
        assert!(text.contains("\"pdf_data\": \"base64_large\""));
    }

    #[test]
    fn test_key_order_independence() {
        let mut forward = BTreeMap::new();
        forward.insert("alpha".to_string(), "int".to_string());
        forward.insert("beta".to_string(), "string".to_string());

        let mut reversed = BTreeMap::new();
        reversed.insert("beta".to_string(), "string".to_string());
        reversed.insert("alpha".to_string(), "int".to_string());

        assert_eq!(
            build_searchable_text("same task", &forward),
            build_searchable_text("same task", &reversed)
        );
    }

    #[test]
    fn test_empty_schema() {
        let text = build_searchable_text("no inputs", &BTreeMap::new());
        assert!(text.ends_with("Input Schema:\n{}"));
    }
}
