//! Shared constants for dimensions, defaults, and sentinels.

/// Embedding dimension of `text-embedding-3-small`, the default model.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// [`DEFAULT_EMBEDDING_DIM`] as `u64` for qdrant collection params.
pub const DEFAULT_EMBEDDING_DIM_U64: u64 = DEFAULT_EMBEDDING_DIM as u64;

/// Default qdrant collection holding cached snippets.
pub const DEFAULT_COLLECTION_NAME: &str = "cached_code";

/// Default embedding model identity. The same model must be used for every
/// stored and queried vector; mixing models silently breaks similarity.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Minimum similarity score for a search hit when the caller does not
/// override it.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.85;

/// Maximum number of matches returned by a search by default.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// When key-compatibility or scope filtering is requested, the store is asked
/// for this many times `limit` candidates, since filtering may discard many
/// near neighbors.
pub const FILTER_FETCH_MULTIPLIER: usize = 3;

/// Cosine distance treated as maximal dissimilarity when converting a raw
/// distance to a bounded score.
pub const MAX_COSINE_DISTANCE: f32 = 2.0;

/// `scope_id` payload value marking an entry as global/unscoped.
///
/// Sentinel entries are visible to unscoped queries only; a query naming a
/// specific scope never sees them.
pub const GLOBAL_SCOPE_ID: i64 = -1;
