//! BLAKE3-based id derivation.
//!
//! Cache entries carry a human-readable string id; qdrant point ids are
//! numeric. The bridge is a 64-bit truncation of a BLAKE3 hash.

/// Computes a 64-bit hash of `data` using BLAKE3, truncated from 256 bits.
///
/// 64 bits of entropy keeps the birthday-bound collision probability
/// negligible at realistic cache sizes (millions of entries). A collision is
/// additionally surfaced by the store, which rejects an `add` for an existing
/// point id instead of overwriting.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}

/// Derives the numeric qdrant point id for a string entry id.
#[inline]
pub fn point_id_for_entry(entry_id: &str) -> u64 {
    hash_to_u64(entry_id.as_bytes())
}
