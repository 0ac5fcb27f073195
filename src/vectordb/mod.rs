//! Qdrant vector store integration.

pub mod client;
pub mod error;
pub mod mock;
pub mod model;

#[cfg(test)]
mod tests;

pub use client::{QdrantStore, VectorStore};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockVectorStore;
pub use model::{CachePoint, QueryHit, RecordPayload, SCOPE_FIELD, cosine_similarity};
