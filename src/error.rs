//! Typed errors for the research library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy is deliberately small: per-URL fetch and extraction
//! problems are not errors at all (see [`crate::fetch::FetchSkip`]) —
//! they degrade result quality, not availability. Only a total inability
//! to obtain candidate URLs, a dead embedding backend, or a blank query
//! can surface to the caller.

use thiserror::Error;

/// Errors that can escape the research pipeline.
#[derive(Debug, Error)]
pub enum ResearchError {
    /// The search provider call itself failed. Without candidate URLs no
    /// further stage can run, so this is the pipeline's one hard failure.
    #[error("search provider unavailable: {0}")]
    SearchUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding backend unavailable or returned a malformed response.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Invalid query provided
    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
}

impl ResearchError {
    /// Wrap a provider-level error as [`ResearchError::SearchUnavailable`].
    pub fn search_unavailable(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SearchUnavailable(Box::new(source))
    }
}

/// Result type alias for research operations.
pub type Result<T> = std::result::Result<T, ResearchError>;
