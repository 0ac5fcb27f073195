//! Embedding provider port and adapters.
//!
//! The cache never substitutes a failed embedding with a zero vector; every
//! provider failure surfaces as an [`EmbeddingError`] and the caller decides
//! whether to fail loud (save) or soft (search).

mod error;
/// Counting mock provider for tests.
pub mod mock;
/// OpenAI `/v1/embeddings` adapter.
pub mod openai;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must keep a single model identity for their lifetime:
/// vectors from different models are not comparable, and the cache stores
/// embeddings once at save time, never recomputing them.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `text` into a vector of exactly [`dim`](Self::dim) elements.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Model identity used for every call.
    fn model(&self) -> &str;

    /// Output vector dimension.
    fn dim(&self) -> usize;
}
