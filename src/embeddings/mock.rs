//! Mock embedding provider for tests
//!
//! Produces deterministic embeddings from text hashes:
//! same text gives the same vector, different texts give different vectors.

use super::traits::EmbeddingProvider;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Deterministic mock embedding provider for tests.
///
/// # Example
///
/// ```rust
/// use qa_graph_agent::embeddings::{EmbeddingProvider, MockEmbeddingProvider};
///
/// # tokio_test::block_on(async {
/// let provider = MockEmbeddingProvider::new(16);
/// let a = provider.embed_text("docker error").await.unwrap();
/// let b = provider.embed_text("docker error").await.unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 16);
/// # });
/// ```
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Spread a chained SipHash over the dimensions, then L2-normalize.
    fn hash_to_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut hash = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            let value = (hash as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);

            let mut h = DefaultHasher::new();
            hash.hash(&mut h);
            hash = h.finish();
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.hash_to_embedding(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock-hash-embedding"
    }
}
