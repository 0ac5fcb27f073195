//! Encoding between [`CacheDocument`] fields and the flat stored payload.
//!
//! Complex fields travel as JSON strings. Encoding is infallible for the
//! types involved; decoding is lenient per field, so one corrupted record
//! degrades to empty structures instead of aborting retrieval of the rest.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::constants::GLOBAL_SCOPE_ID;
use crate::vectordb::RecordPayload;

use super::document::{CacheDocument, CacheMatch, EntryMetadata};

/// Flattens a document into the stored payload.
pub fn encode_payload(entry_id: &str, document: &CacheDocument, created_at: String) -> RecordPayload {
    RecordPayload {
        entry_id: entry_id.to_string(),
        code: document.code.clone(),
        action: document.action.clone(),
        action_description: document.action_description.clone(),
        scope_id: document.scope_id.unwrap_or(GLOBAL_SCOPE_ID),
        success_count: i64::from(document.metadata.success_count),
        created_at,
        input_schema_json: encode_json(&document.input_schema),
        config_json: encode_json(&document.config),
        insights_json: encode_json(&document.insights),
        libraries_json: encode_json(&document.metadata.libraries_used),
        required_keys_json: encode_json(&document.metadata.required_keys),
    }
}

/// Rebuilds a match from a stored payload plus its similarity score.
pub fn decode_match(payload: &RecordPayload, score: f32) -> CacheMatch {
    CacheMatch {
        code: payload.code.clone(),
        score,
        action: payload.action.clone(),
        action_description: payload.action_description.clone(),
        input_schema: decode_input_schema(&payload.input_schema_json),
        insights: decode_string_list(&payload.insights_json),
        config: decode_config(&payload.config_json),
        metadata: EntryMetadata {
            success_count: u32::try_from(payload.success_count).unwrap_or(0),
            created_at: payload.created_at.clone(),
            libraries_used: decode_string_list(&payload.libraries_json),
            required_keys: decode_string_list(&payload.required_keys_json),
        },
    }
}

fn encode_json<T: serde::Serialize>(value: &T) -> String {
    // String maps, string vectors, and Value maps serialize infallibly.
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Decodes a stored input schema; malformed input yields an empty schema.
pub fn decode_input_schema(json: &str) -> BTreeMap<String, String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Decodes stored config flags; malformed input yields an empty map.
pub fn decode_config(json: &str) -> Map<String, Value> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Decodes a stored string list; malformed input yields an empty list.
pub fn decode_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> CacheDocument {
        let mut input_schema = BTreeMap::new();
        input_schema.insert("pdf_data".to_string(), "base64_large".to_string());

        let mut config = Map::new();
        config.insert("has_credentials".to_string(), Value::Bool(false));

        CacheDocument {
            description: "Extracts text from PDF using PyMuPDF".to_string(),
            input_schema,
            insights: vec!["PDF format".to_string(), "Text extraction".to_string()],
            config,
            code: "import fitz\n...".to_string(),
            action: "extract_pdf".to_string(),
            action_description: "Extract invoice text".to_string(),
            scope_id: Some(5),
            metadata: EntryMetadata {
                success_count: 3,
                created_at: "2026-08-30T10:00:00Z".to_string(),
                libraries_used: vec!["fitz".to_string(), "base64".to_string()],
                required_keys: vec!["pdf_data".to_string()],
            },
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let document = sample_document();
        let payload = encode_payload(
            "code_0_1",
            &document,
            document.metadata.created_at.clone(),
        );

        assert_eq!(payload.entry_id, "code_0_1");
        assert_eq!(payload.scope_id, 5);

        let matched = decode_match(&payload, 0.9321);

        assert_eq!(matched.code, document.code);
        assert_eq!(matched.input_schema, document.input_schema);
        assert_eq!(matched.insights, document.insights);
        assert_eq!(matched.config, document.config);
        assert_eq!(matched.metadata, document.metadata);
        assert_eq!(matched.score, 0.9321);
    }

    #[test]
    fn test_unscoped_document_gets_sentinel() {
        let mut document = sample_document();
        document.scope_id = None;

        let payload = encode_payload("code_0_1", &document, String::new());
        assert_eq!(payload.scope_id, GLOBAL_SCOPE_ID);
    }

    #[test]
    fn test_decode_is_lenient_per_field() {
        let document = sample_document();
        let mut payload = encode_payload("code_0_1", &document, String::new());
        payload.input_schema_json = "{not json".to_string();

        let matched = decode_match(&payload, 0.9);

        // Only the corrupted field degrades; the rest survives.
        assert!(matched.input_schema.is_empty());
        assert_eq!(matched.insights, document.insights);
        assert_eq!(matched.metadata.libraries_used, document.metadata.libraries_used);
    }

    #[test]
    fn test_decode_empty_strings() {
        assert!(decode_input_schema("").is_empty());
        assert!(decode_config("").is_empty());
        assert!(decode_string_list("").is_empty());
    }
}
