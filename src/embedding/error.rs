use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding providers.
pub enum EmbeddingError {
    /// The HTTP request to the provider could not be completed.
    #[error("embedding request failed: {reason}")]
    RequestFailed {
        /// Error message.
        reason: String,
    },

    /// The provider answered with a non-success status.
    #[error("embedding provider rejected request (status {status}): {message}")]
    ProviderRejected {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The provider response could not be parsed.
    #[error("failed to parse embedding response: {reason}")]
    ResponseParseFailed {
        /// Error message.
        reason: String,
    },

    /// The provider returned no embedding for the input.
    #[error("embedding provider returned an empty response")]
    EmptyResponse,

    /// The returned vector has the wrong dimension.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::RequestFailed {
            reason: err.to_string(),
        }
    }
}
