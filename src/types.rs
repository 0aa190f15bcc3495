//! Core data types flowing through the pipeline.

use serde::{Deserialize, Serialize};

/// A bounded word window extracted from one fetched page's text.
///
/// A passage never spans multiple pages; its `source_url` always refers
/// to a page that yielded non-empty extracted text. Immutable once
/// created by the chunking stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    /// URL of the page this passage was extracted from.
    pub source_url: String,

    /// Contiguous word window of the page's extracted text.
    pub text: String,
}

impl Passage {
    /// Create a new passage.
    pub fn new(source_url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            text: text.into(),
        }
    }

    /// Word count of the passage text.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A passage plus its relevance to the query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    /// The underlying passage.
    pub passage: Passage,

    /// Cosine similarity to the query, in [-1, 1] (practically [0, 1]
    /// for normalized sentence embeddings).
    pub score: f32,

    /// 0-based position after the descending-score stable sort.
    pub rank: usize,
}

/// The pipeline's sole output, constructed once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    /// The query that produced this result.
    pub query: String,

    /// Top-ranked passages, descending by score, at most `top_passages`.
    pub passages: Vec<ScoredPassage>,

    /// Extractive summary of the best passage, with source attribution.
    /// Empty when no passage survived fetch and chunking.
    pub summary: String,

    /// Wall-clock duration of the run in seconds. Zero for the
    /// empty-pool early exit.
    pub elapsed_seconds: f64,
}

impl ResearchResult {
    /// A well-formed empty result for the empty-pool terminal case.
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            passages: Vec::new(),
            summary: String::new(),
            elapsed_seconds: 0.0,
        }
    }

    /// True if the run yielded no passages.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// The best-ranked passage, if any.
    pub fn top_passage(&self) -> Option<&ScoredPassage> {
        self.passages.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        let p = Passage::new("https://example.com", "three word text");
        assert_eq!(p.word_count(), 3);
    }

    #[test]
    fn test_empty_result() {
        let result = ResearchResult::empty("capital of France");
        assert!(result.is_empty());
        assert!(result.summary.is_empty());
        assert_eq!(result.elapsed_seconds, 0.0);
        assert!(result.top_passage().is_none());
    }
}
