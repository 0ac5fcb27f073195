use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_LIMIT};

/// A snippet submitted for caching.
///
/// Entries are immutable: saving "the same" logical snippet again creates a
/// new entry with a new id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheDocument {
    /// Natural-language summary of what the code does. Embedded.
    pub description: String,

    /// Field name -> type tag (e.g. `"base64_large"`, `"int"`). Embedded in
    /// canonical key order; a sorted map makes key-order independence
    /// structural.
    #[serde(default)]
    pub input_schema: BTreeMap<String, String>,

    /// Free-text context notes. Persisted, deliberately excluded from the
    /// embedded text so secondary context does not dilute the match signal.
    #[serde(default)]
    pub insights: Vec<String>,

    /// Precondition flags (credential presence etc). Persisted, not
    /// embedded.
    #[serde(default)]
    pub config: Map<String, Value>,

    /// The snippet itself; opaque to the cache.
    pub code: String,

    /// Classification label of the snippet's origin node.
    #[serde(default)]
    pub action: String,

    /// Description of the origin node.
    #[serde(default)]
    pub action_description: String,

    /// Optional isolation scope. `None` stores the entry as global.
    #[serde(default)]
    pub scope_id: Option<i64>,

    /// Execution metadata.
    #[serde(default)]
    pub metadata: EntryMetadata,
}

/// Execution metadata carried with each entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Successful executions before caching.
    #[serde(default = "default_success_count")]
    pub success_count: u32,

    /// RFC 3339 creation timestamp; stamped at save time when empty.
    #[serde(default)]
    pub created_at: String,

    /// Libraries the snippet imports.
    #[serde(default)]
    pub libraries_used: Vec<String>,

    /// Input keys the code actually reads, per static analysis. Surfaced to
    /// callers for their own validation; the cache never enforces them (the
    /// extraction is not reliable enough for dynamic or conditional access).
    #[serde(default)]
    pub required_keys: Vec<String>,
}

fn default_success_count() -> u32 {
    1
}

impl Default for EntryMetadata {
    fn default() -> Self {
        Self {
            success_count: default_success_count(),
            created_at: String::new(),
            libraries_used: Vec::new(),
            required_keys: Vec::new(),
        }
    }
}

/// Search constraints. Defaults match the external interface: threshold
/// `0.85`, limit `5`, no key filter, no scope.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Minimum similarity score in `[0, 1]`.
    pub threshold: f32,

    /// Maximum number of accepted matches.
    pub limit: usize,

    /// When set, a candidate is kept only if every key of its declared
    /// input schema is present here.
    pub available_keys: Option<Vec<String>>,

    /// When set, only entries saved under this exact scope are considered.
    pub scope_id: Option<i64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SCORE_THRESHOLD,
            limit: DEFAULT_SEARCH_LIMIT,
            available_keys: None,
            scope_id: None,
        }
    }
}

impl SearchParams {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_available_keys(mut self, keys: Vec<String>) -> Self {
        self.available_keys = Some(keys);
        self
    }

    pub fn with_scope_id(mut self, scope_id: i64) -> Self {
        self.scope_id = Some(scope_id);
        self
    }

    /// True when a downstream filter may discard near neighbors, in which
    /// case the store is asked for a wider candidate set.
    pub fn needs_wide_fetch(&self) -> bool {
        self.available_keys.is_some() || self.scope_id.is_some()
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct CacheMatch {
    /// The cached snippet.
    pub code: String,
    /// Similarity score in `[0, 1]`, rounded to 4 decimals.
    pub score: f32,
    /// Origin node action label.
    pub action: String,
    /// Origin node description.
    pub action_description: String,
    /// Decoded input schema.
    pub input_schema: BTreeMap<String, String>,
    /// Stored context notes.
    pub insights: Vec<String>,
    /// Stored precondition flags.
    pub config: Map<String, Value>,
    /// Decoded metadata, `required_keys` included for caller-side
    /// validation.
    pub metadata: EntryMetadata,
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of stored entries.
    pub total: u64,
    /// Distinct action labels, sorted.
    pub actions: Vec<String>,
    /// Mean success count, rounded to 2 decimals.
    pub avg_success_count: f64,
}

impl CacheStats {
    pub fn empty() -> Self {
        Self {
            total: 0,
            actions: Vec::new(),
            avg_success_count: 0.0,
        }
    }
}
