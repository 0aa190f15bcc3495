//! Embedding model trait for semantic similarity.
//!
//! The embedding model is a black-box service with a narrow contract:
//! a list of strings in, one fixed-dimension float vector per string
//! out, in the same order, deterministic for identical input text and
//! model version.
//!
//! # Shared instance
//!
//! Loading an embedding model (or holding a warm HTTP client to one) is
//! expensive relative to a single query, so the model is meant to be a
//! process-wide resource: created once, read-only after initialization,
//! shared across in-flight queries. [`init_shared_embedder`] and
//! [`shared_embedder`] express that contract explicitly instead of
//! relying on implicit memoized globals.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::{ResearchError, Result};

/// Embedding model trait.
///
/// Inference calls are stateless with respect to model parameters, so
/// implementations must be safe for concurrent read access.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch operation).
    ///
    /// More efficient than calling `embed` multiple times.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        // Default implementation calls embed sequentially
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}

static SHARED_EMBEDDER: OnceLock<Arc<dyn Embedder>> = OnceLock::new();

/// Install the process-wide embedder. May be called at most once; a
/// second call returns the rejected embedder to the caller.
pub fn init_shared_embedder(
    embedder: Arc<dyn Embedder>,
) -> std::result::Result<(), Arc<dyn Embedder>> {
    SHARED_EMBEDDER.set(embedder)
}

/// The process-wide embedder, if one has been installed.
pub fn shared_embedder() -> Option<Arc<dyn Embedder>> {
    SHARED_EMBEDDER.get().cloned()
}

#[async_trait]
impl Embedder for Arc<dyn Embedder> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.as_ref().embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.as_ref().embed_batch(texts).await
    }
}

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
    dimensions: Option<usize>,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder for a base URL and model name.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl AsRef<str>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/embeddings", base_url.as_ref().trim_end_matches('/')),
            model: model.into(),
            api_key: SecretString::from(api_key.into()),
            dimensions: None,
        }
    }

    /// Request a specific output dimensionality, for models that support it.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text]).await?;
        vectors
            .pop()
            .ok_or_else(|| ResearchError::Embedding("empty response for single input".into()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| ResearchError::Embedding(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ResearchError::Embedding(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(ResearchError::Embedding(format!(
                "embeddings request failed ({status}): {body}"
            )));
        }

        let mut parsed: EmbeddingResponse = serde_json::from_str(&body)
            .map_err(|e| ResearchError::Embedding(format!("malformed response: {e}")))?;

        // The API may return entries out of order.
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != texts.len() {
            return Err(ResearchError::Embedding(format!(
                "got {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        Ok(parsed
            .data
            .into_iter()
            .map(|entry| entry.embedding)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockEmbedder;

    #[tokio::test]
    async fn test_default_embed_batch_preserves_order() {
        let embedder = MockEmbedder::new()
            .with_embedding("a", vec![1.0, 0.0])
            .with_embedding("b", vec![0.0, 1.0]);

        let vectors = embedder.embed_batch(&["a", "b"]).await.unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_shared_embedder_install_once() {
        // OnceLock state is process-wide; this test owns it.
        let first: Arc<dyn Embedder> = Arc::new(MockEmbedder::new());
        let second: Arc<dyn Embedder> = Arc::new(MockEmbedder::new());

        let _ = init_shared_embedder(first);
        assert!(shared_embedder().is_some());
        assert!(init_shared_embedder(second).is_err());
    }
}
