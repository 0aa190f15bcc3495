//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the research
//! library without making real embedding or network calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::error::Result;
use crate::traits::embedder::Embedder;

/// A mock embedder for testing.
///
/// Texts registered via [`with_embedding`](Self::with_embedding) return
/// their canned vector; everything else gets a deterministic
/// hashed-bag-of-words vector, so overlapping texts land near each other
/// and ranking tests behave like they would against a real model.
/// Clones share state, so a clone kept outside the pipeline can assert
/// on calls made inside it.
#[derive(Clone)]
pub struct MockEmbedder {
    /// Predefined embeddings by exact text
    embeddings: Arc<RwLock<HashMap<String, Vec<f32>>>>,

    /// Dimension of generated default embeddings
    dim: usize,

    /// Number of embed/embed_batch invocations, for assertions
    calls: Arc<AtomicUsize>,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self {
            embeddings: Arc::new(RwLock::new(HashMap::new())),
            dim: 16,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockEmbedder {
    /// Create a new mock embedder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dimension of generated default embeddings.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }

    /// Add a predefined embedding for an exact text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.embeddings
            .write()
            .unwrap()
            .insert(text.into(), embedding);
        self
    }

    /// Number of embedding calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(canned) = self.embeddings.read().unwrap().get(text) {
            return canned.clone();
        }
        self.hashed_embedding(text)
    }

    /// Unit-length term-frequency vector with FNV-hashed word buckets.
    fn hashed_embedding(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for word in text.to_lowercase().split_whitespace() {
            let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
            for byte in word.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x100_0000_01b3);
            }
            vector[(hash % self.dim as u64) as usize] += 1.0;
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

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

/// Serve a fixed response from a local socket; returns the page URL.
///
/// Every connection receives the same status, content type, and body, so
/// fetch paths can be exercised without touching the network.
pub async fn spawn_page(body: &str, content_type: &str, status: u16) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let response = response.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://{addr}/")
}

/// A local socket that accepts connections but never responds; returns
/// its URL. For exercising the fetch timeout path.
pub async fn spawn_unresponsive() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                // Hold the connection open without ever answering.
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            });
        }
    });

    format!("http://{addr}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedder_is_deterministic() {
        let embedder = MockEmbedder::new();
        let a = embedder.embed("capital of France").await.unwrap();
        let b = embedder.embed("capital of France").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(embedder.call_count(), 2);
    }

    #[tokio::test]
    async fn test_overlapping_texts_are_closer_than_disjoint() {
        let embedder = MockEmbedder::new().with_dim(64);
        let query = embedder.embed("capital of France").await.unwrap();
        let near = embedder
            .embed("Paris is the capital of France")
            .await
            .unwrap();
        let far = embedder
            .embed("rust borrow checker lifetimes")
            .await
            .unwrap();

        let near_score = crate::rank::cosine_similarity(&query, &near);
        let far_score = crate::rank::cosine_similarity(&query, &far);
        assert!(near_score > far_score);
    }

    #[tokio::test]
    async fn test_canned_embedding_takes_priority() {
        let embedder = MockEmbedder::new().with_embedding("x", vec![9.0]);
        assert_eq!(embedder.embed("x").await.unwrap(), vec![9.0]);
    }
}
