//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Embedding dimension string could not be parsed as a number.
    #[error("failed to parse embedding dimension '{value}': {source}")]
    DimParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Embedding dimension is zero.
    #[error("invalid embedding dimension '{value}': must be greater than 0")]
    InvalidDim { value: String },

    /// Collection name is empty or whitespace-only.
    #[error("collection name must not be empty")]
    EmptyCollectionName,

    /// Qdrant URL is empty or whitespace-only.
    #[error("qdrant URL must not be empty")]
    EmptyQdrantUrl,

    /// A required environment variable was not set.
    #[error("missing required environment variable: {name}")]
    MissingEnvVar { name: &'static str },
}
