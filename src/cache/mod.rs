//! Cache service: save, search, stats, clear.

pub mod document;
pub mod error;
pub mod payload;
pub mod searchable;
pub mod service;


pub use document::{CacheDocument, CacheMatch, CacheStats, EntryMetadata, SearchParams};
pub use error::{CacheError, CacheResult};
pub use payload::{decode_match, encode_payload};
pub use searchable::build_searchable_text;
pub use service::{CodeCacheHandle, CodeCacheService, score_from_distance};
