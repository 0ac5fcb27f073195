use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::error::EmbeddingError;
use super::EmbeddingProvider;
use crate::hashing::hash_to_u64;

/// Deterministic in-process embedder for tests.
///
/// Produces a hashed bag-of-words vector: every lowercased token bumps one
/// dimension, then the vector is L2-normalized. Identical texts embed
/// identically and texts sharing vocabulary land close in cosine space, which
/// is enough to exercise threshold and ranking behavior without a network
/// call. Tracks how many times `embed` ran so tests can assert the
/// empty-store short circuit.
pub struct MockEmbedder {
    dim: usize,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Number of completed `embed` calls (including failed ones).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `embed` call fail, for error-path tests.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn bag_of_words(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            let index = (hash_to_u64(token.as_bytes()) % self.dim as u64) as usize;
            vector[index] += 1.0;
        }

        let norm: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::RequestFailed {
                reason: "mock embedder set to fail".to_string(),
            });
        }

        Ok(self.bag_of_words(text))
    }

    fn model(&self) -> &str {
        "mock-bag-of-words"
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
