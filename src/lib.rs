//! Semantic cache for AI-generated code snippets.
//!
//! Stores a snippet together with its description, input schema, and
//! execution metadata, and retrieves snippets whose meaning matches a new
//! request, subject to a similarity threshold, a structural
//! key-compatibility constraint, and an optional isolation scope.
//!
//! # Architecture
//!
//! - [`CodeCacheService`] orchestrates save and search over two ports:
//! - [`EmbeddingProvider`] maps text to fixed-dimension vectors
//!   ([`OpenAiEmbedder`] speaks the OpenAI `/v1/embeddings` wire format);
//! - [`VectorStore`] persists and queries vectors ([`QdrantStore`] is the
//!   qdrant adapter).
//!
//! Save is fail-closed: validation runs before any external call and a
//! failure creates no partial entry. Search is fail-open: any provider or
//! store failure degrades to "no cache hit" so the surrounding workflow
//! never errors out over a cache miss.
//!
//! ```no_run
//! use codecache::{CodeCacheService, Config, OpenAiEmbedder, QdrantStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! config.validate()?;
//!
//! let embedder = OpenAiEmbedder::new(
//!     &config.openai_base_url,
//!     config.require_openai_api_key()?,
//!     &config.embedding_model,
//!     config.embedding_dim,
//! );
//! let store = QdrantStore::new(&config.qdrant_url).await?;
//!
//! let cache = CodeCacheService::new(embedder, store, &config.collection_name);
//! cache.ensure_collection().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Test/Mock Support
//!
//! [`MockEmbedder`] and [`MockVectorStore`] are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod hashing;
pub mod vectordb;

pub use cache::{
    CacheDocument, CacheError, CacheMatch, CacheResult, CacheStats, CodeCacheHandle,
    CodeCacheService, EntryMetadata, SearchParams, build_searchable_text, score_from_distance,
};

pub use config::{Config, ConfigError, DEFAULT_OPENAI_BASE_URL, DEFAULT_QDRANT_URL};

pub use constants::{
    DEFAULT_COLLECTION_NAME, DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL,
    DEFAULT_SCORE_THRESHOLD, DEFAULT_SEARCH_LIMIT, FILTER_FETCH_MULTIPLIER, GLOBAL_SCOPE_ID,
    MAX_COSINE_DISTANCE,
};

pub use embedding::{EmbeddingError, EmbeddingProvider, OpenAiEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;

pub use hashing::{hash_to_u64, point_id_for_entry};

#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorStore;
pub use vectordb::{
    CachePoint, QdrantStore, QueryHit, RecordPayload, SCOPE_FIELD, VectorDbError, VectorStore,
    cosine_similarity,
};
