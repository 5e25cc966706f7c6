//! Question embedding
//!
//! By default questions are encoded inside Neo4j by the GenAI plugin. When an
//! embedding endpoint is configured, the vector is computed here instead and
//! handed to the query as a parameter.
//!
//! - `EmbeddingProvider` trait: async interface for embedding generation
//! - `HttpEmbeddingProvider`: any OpenAI-compatible `/v1/embeddings` API
//! - `MockEmbeddingProvider`: deterministic mock for tests

pub mod mock;
pub mod provider;
pub mod traits;

pub use mock::MockEmbeddingProvider;
pub use provider::HttpEmbeddingProvider;
pub use traits::EmbeddingProvider;
