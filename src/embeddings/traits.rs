//! EmbeddingProvider trait definition
//!
//! Defines the abstract interface for turning a user's question into a
//! vector. Follows the same pattern as `GraphStore`:
//! async trait + Send + Sync for `Arc<dyn EmbeddingProvider>` usage.

use anyhow::Result;
use async_trait::async_trait;

/// Abstract interface for generating vector embeddings from text.
///
/// # Implementations
///
/// - [`HttpEmbeddingProvider`](super::HttpEmbeddingProvider): HTTP client for any
///   OpenAI-compatible `/v1/embeddings` endpoint
/// - [`MockEmbeddingProvider`](super::MockEmbeddingProvider): deterministic mock
///   that produces consistent embeddings from text hashes (for tests)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate a vector embedding for a single text input.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding generation fails (network error,
    /// API error, dimension mismatch).
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// The dimensionality of the vectors produced by this provider.
    ///
    /// Must match the dimension of the graph's vector indexes.
    fn dimensions(&self) -> usize;

    /// The name of the embedding model being used.
    fn model_name(&self) -> &str;
}
