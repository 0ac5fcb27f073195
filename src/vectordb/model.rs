use std::collections::HashMap;

use qdrant_client::qdrant::{RetrievedPoint, ScoredPoint, Value};

/// Flat payload stored alongside each vector.
///
/// Scalar fields are stored natively; complex fields (`input_schema`,
/// `config`, `insights`, `libraries_used`, `required_keys`) are stored as
/// JSON strings so the record round-trips through any payload store. The
/// cache service owns encoding and decoding of the `*_json` fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPayload {
    /// Human-readable entry id (`code_{seq}_{nanos}`).
    pub entry_id: String,
    /// The cached snippet itself.
    pub code: String,
    /// Origin node action label.
    pub action: String,
    /// Origin node description.
    pub action_description: String,
    /// Isolation scope; [`crate::constants::GLOBAL_SCOPE_ID`] when unscoped.
    pub scope_id: i64,
    /// Times this snippet executed successfully before being cached.
    pub success_count: i64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// JSON object: field name -> type tag.
    pub input_schema_json: String,
    /// JSON object of precondition flags.
    pub config_json: String,
    /// JSON array of free-text context notes.
    pub insights_json: String,
    /// JSON array of library names.
    pub libraries_json: String,
    /// JSON array of keys the code actually reads.
    pub required_keys_json: String,
}

/// Payload field holding the scope, used for server-side exact-match
/// filtering.
pub const SCOPE_FIELD: &str = "scope_id";

impl RecordPayload {
    /// Converts to a qdrant payload map.
    pub fn to_qdrant_payload(&self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert("entry_id".to_string(), self.entry_id.clone().into());
        payload.insert("code".to_string(), self.code.clone().into());
        payload.insert("action".to_string(), self.action.clone().into());
        payload.insert(
            "action_description".to_string(),
            self.action_description.clone().into(),
        );
        payload.insert(SCOPE_FIELD.to_string(), self.scope_id.into());
        payload.insert("success_count".to_string(), self.success_count.into());
        payload.insert("created_at".to_string(), self.created_at.clone().into());
        payload.insert(
            "input_schema".to_string(),
            self.input_schema_json.clone().into(),
        );
        payload.insert("config".to_string(), self.config_json.clone().into());
        payload.insert("insights".to_string(), self.insights_json.clone().into());
        payload.insert(
            "libraries_used".to_string(),
            self.libraries_json.clone().into(),
        );
        payload.insert(
            "required_keys".to_string(),
            self.required_keys_json.clone().into(),
        );
        payload
    }

    /// Extracts a payload from a qdrant payload map.
    ///
    /// Missing or mistyped fields fall back to defaults; a partially
    /// corrupted record must never abort a scan or search.
    pub fn from_qdrant_payload(payload: &HashMap<String, Value>) -> Self {
        Self {
            entry_id: get_string(payload, "entry_id"),
            code: get_string(payload, "code"),
            action: get_string(payload, "action"),
            action_description: get_string(payload, "action_description"),
            scope_id: get_integer(payload, SCOPE_FIELD),
            success_count: get_integer(payload, "success_count"),
            created_at: get_string(payload, "created_at"),
            input_schema_json: get_string(payload, "input_schema"),
            config_json: get_string(payload, "config"),
            insights_json: get_string(payload, "insights"),
            libraries_json: get_string(payload, "libraries_used"),
            required_keys_json: get_string(payload, "required_keys"),
        }
    }
}

fn get_string(payload: &HashMap<String, Value>, key: &str) -> String {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn get_integer(payload: &HashMap<String, Value>, key: &str) -> i64 {
    payload
        .get(key)
        .and_then(|v| v.as_integer())
        .unwrap_or_default()
}

/// A point to insert: numeric id, embedding, and flat payload.
#[derive(Debug, Clone)]
pub struct CachePoint {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: RecordPayload,
}

impl CachePoint {
    pub fn new(id: u64, vector: Vec<f32>, payload: RecordPayload) -> Self {
        Self {
            id,
            vector,
            payload,
        }
    }
}

/// A nearest-neighbor candidate.
///
/// `distance` is cosine distance (`1 - cosine similarity`), in `[0, 2]`;
/// smaller means more similar. Query results arrive in ascending order.
#[derive(Debug, Clone)]
pub struct QueryHit {
    pub distance: f32,
    pub payload: RecordPayload,
}

impl QueryHit {
    /// Builds a hit from a qdrant scored point.
    ///
    /// Qdrant reports cosine *similarity* for cosine collections; this
    /// converts back to distance so the store contract stays
    /// metric-agnostic (smaller = closer).
    pub fn from_scored_point(point: ScoredPoint) -> Self {
        Self {
            distance: 1.0 - point.score,
            payload: RecordPayload::from_qdrant_payload(&point.payload),
        }
    }
}

/// Extracts the payload of a scrolled point (full-scan path).
pub fn payload_from_retrieved_point(point: &RetrievedPoint) -> RecordPayload {
    RecordPayload::from_qdrant_payload(&point.payload)
}

/// Cosine similarity between two vectors; `0.0` for mismatched or empty
/// inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
