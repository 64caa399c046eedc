//! Bag-of-words hash embeddings.
//!
//! Every word of the lowercased text bumps one bucket, chosen by
//! `xxh3(word) mod dim`, and the result is L2-normalized. Identical text always
//! produces an identical vector, so query vectors can be computed once and
//! compared across systems.

use xxhash_rust::xxh3::xxh3_64;

use crate::Embedding;

/// Deterministic hashing embedder with a fixed dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Embed `text`. Empty (or whitespace-only) text yields the zero vector.
    pub fn embed(&self, text: &str) -> Embedding {
        if self.dim == 0 {
            return Embedding::zeros(0);
        }

        let mut buckets = vec![0.0f32; self.dim];
        for word in text.to_lowercase().split_whitespace() {
            let bucket = (xxh3_64(word.as_bytes()) % self.dim as u64) as usize;
            buckets[bucket] += 1.0;
        }

        let mut embedding = Embedding::new(buckets);
        embedding.normalize();
        embedding
    }
}
