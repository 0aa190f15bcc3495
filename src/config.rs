//! Configuration for the research pipeline.

use serde::{Deserialize, Serialize};

/// Configuration for a research run.
///
/// All limits are compile-time/config defaults, not a runtime surface:
/// the pipeline exposes one operation and these knobs shape it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Maximum candidate URLs requested from the search provider.
    ///
    /// Default: 6.
    pub search_results: usize,

    /// Maximum passages kept per page, taken in document order from the
    /// start of the extracted text. Later content on long pages is
    /// deliberately discarded.
    ///
    /// Default: 4.
    pub passages_per_page: usize,

    /// Word-window size for passage chunking. The final window of a page
    /// may be shorter; words are never split across windows.
    ///
    /// Default: 120.
    pub chunk_words: usize,

    /// Number of top-ranked passages carried into the result.
    ///
    /// Default: 5.
    pub top_passages: usize,

    /// Leading sentences of the best passage used for the summary.
    ///
    /// Default: 2.
    pub summary_sentences: usize,

    /// Per-fetch timeout in seconds. The only cancellation-like mechanism
    /// in the pipeline; keeps one unresponsive page from stalling a run.
    ///
    /// Default: 8.
    pub fetch_timeout_secs: u64,

    /// Identifying User-Agent sent with every page fetch.
    pub user_agent: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            search_results: 6,
            passages_per_page: 4,
            chunk_words: 120,
            top_passages: 5,
            summary_sentences: 2,
            fetch_timeout_secs: 8,
            user_agent: "Mozilla/5.0 (research-agent)".to_string(),
        }
    }
}

impl ResearchConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum search results.
    pub fn with_search_results(mut self, max: usize) -> Self {
        self.search_results = max;
        self
    }

    /// Set the per-page passage cap.
    pub fn with_passages_per_page(mut self, max: usize) -> Self {
        self.passages_per_page = max;
        self
    }

    /// Set the chunk window size in words.
    pub fn with_chunk_words(mut self, words: usize) -> Self {
        self.chunk_words = words;
        self
    }

    /// Set the number of top passages to keep.
    pub fn with_top_passages(mut self, top: usize) -> Self {
        self.top_passages = top;
        self
    }

    /// Set the summary sentence count.
    pub fn with_summary_sentences(mut self, sentences: usize) -> Self {
        self.summary_sentences = sentences;
        self
    }

    /// Set the per-fetch timeout in seconds.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Set a custom User-Agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
