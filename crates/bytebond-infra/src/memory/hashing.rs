//! Deterministic feature-hashing embedder.
//!
//! Maps each lowercase alphanumeric token to a signed bucket with FNV-1a
//! and L2-normalizes the result. Texts that share words land close
//! together under cosine similarity. Stable across runs and platforms,
//! needs no network, and is what the binary uses without an API key.

use bytebond_core::memory::embedder::Embedder;
use bytebond_types::error::EmbeddingError;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dimension`-length vectors (minimum 1).
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn fnv1a(token: &str) -> u64 {
        token.bytes().fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .map(|t| t.trim_matches('\''))
            .filter(|t| !t.is_empty())
        {
            let hash = Self::fnv1a(token);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }
}

impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        Ok(self.vectorize(text))
    }

    fn model_name(&self) -> &str {
        "hashing-bow-v1"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
