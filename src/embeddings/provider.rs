//! HTTP embedding provider implementation
//!
//! Implements `EmbeddingProvider` using any OpenAI-compatible `/v1/embeddings` endpoint.
//! It must produce vectors from the same model that populated the graph's
//! vector indexes, otherwise similarity scores are meaningless.
//!
//! Configuration via environment variables:
//! - `EMBEDDING_URL` (unset: questions are encoded inside Neo4j instead)
//! - `EMBEDDING_MODEL` (default: `text-embedding-3-small`)
//! - `EMBEDDING_API_KEY` (falls back to `OPENAI_API_KEY`)
//! - `EMBEDDING_DIMENSIONS` (default: `1536`)

use super::traits::EmbeddingProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP-based embedding provider using the OpenAI `/v1/embeddings` API format.
///
/// Thread-safe and cheaply cloneable (shares the reqwest client internally).
#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
}

/// OpenAI-compatible embedding request
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

/// OpenAI-compatible embedding response
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible error response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl HttpEmbeddingProvider {
    /// Create a new HTTP embedding provider with explicit configuration.
    ///
    /// # Arguments
    ///
    /// * `url` - The embedding API endpoint (e.g., `https://api.openai.com/v1/embeddings`)
    /// * `model` - The model name to use (e.g., `text-embedding-3-small`)
    /// * `api_key` - Optional API key for authenticated endpoints
    /// * `dimensions` - Expected embedding dimensions (must match the vector indexes)
    pub fn new(
        url: String,
        model: String,
        api_key: Option<String>,
        dimensions: usize,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            model,
            api_key,
            dimensions,
        })
    }

    /// Create a provider from environment variables.
    ///
    /// Returns `Ok(None)` unless `EMBEDDING_URL` is set to something other
    /// than empty or "disabled".
    pub fn from_env() -> Result<Option<Self>> {
        let url = match std::env::var("EMBEDDING_URL") {
            Ok(url) if !url.is_empty() && !url.eq_ignore_ascii_case("disabled") => url,
            _ => return Ok(None),
        };

        let model = std::env::var("EMBEDDING_MODEL")
            .unwrap_or_else(|_| "text-embedding-3-small".to_string());

        let api_key = std::env::var("EMBEDDING_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty());

        let dimensions: usize = std::env::var("EMBEDDING_DIMENSIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1536);

        Self::new(url, model, api_key, dimensions).map(Some)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        let mut req = self.client.post(&self.url).json(&request_body);

        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req
            .send()
            .await
            .with_context(|| format!("Failed to connect to embedding API at {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if let Ok(ErrorResponse {
                error: Some(detail),
            }) = serde_json::from_str::<ErrorResponse>(&body)
            {
                anyhow::bail!(
                    "Embedding API error ({}): {}",
                    status.as_u16(),
                    detail.message
                );
            }
            anyhow::bail!("Embedding API returned {}: {}", status.as_u16(), body);
        }

        let resp: EmbeddingResponse = response
            .json()
            .await
            .context("Failed to parse embedding API response")?;

        let embedding = resp
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("Embedding API returned empty response")?;

        if embedding.len() != self.dimensions {
            anyhow::bail!(
                "Embedding dimension mismatch: expected {}, got {} (model: {})",
                self.dimensions,
                embedding.len(),
                self.model
            );
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
