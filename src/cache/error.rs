use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Errors returned by the cache service.
///
/// Only `save`, `stats`, and `clear` surface these; `search` is fail-open
/// and degrades to an empty result instead.
pub enum CacheError {
    /// A required document field is missing or empty. Raised before any
    /// external call.
    #[error("missing or empty required field: {field}")]
    Validation {
        /// Field name.
        field: &'static str,
    },

    /// Embedding provider failure.
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Vector store failure.
    #[error("vector store error: {0}")]
    Store(#[from] VectorDbError),
}

/// Convenience result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
