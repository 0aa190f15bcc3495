//! Query-Driven Web Research Library
//!
//! Answers a natural-language query by retrieving web pages, extracting
//! readable text, splitting it into passages, ranking those passages by
//! semantic similarity to the query, and producing a short extractive
//! summary from the single best-ranked passage.
//!
//! # Design Philosophy
//!
//! **"Best effort, many sources"**
//!
//! - The pipeline chains several lossy stages (network I/O, HTML
//!   structure variance, vector similarity, sentence segmentation) and
//!   degrades gracefully when any stage yields nothing
//! - Per-URL failures are absorbed and logged, never fatal
//! - Only a total inability to obtain candidate URLs is a hard failure
//! - External services (search provider, embedding model) sit behind
//!   traits with narrow contracts
//!
//! # Usage
//!
//! ```rust,ignore
//! use research::{DuckDuckGoSearcher, HttpEmbedder, Research};
//!
//! let searcher = DuckDuckGoSearcher::new();
//! let embedder = HttpEmbedder::new(api_key, "https://api.openai.com/v1", "text-embedding-3-small");
//! let research = Research::new(searcher, embedder);
//!
//! let result = research.run("capital of France").await?;
//! println!("{}", result.summary);
//! for scored in &result.passages {
//!     println!("{:.3}  {}", scored.score, scored.passage.source_url);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (WebSearcher, Embedder)
//! - [`types`] - Pipeline data types (Passage, ScoredPassage, ResearchResult)
//! - [`pipeline`] - The research pipeline orchestrator
//! - [`fetch`] - Best-effort page fetching
//! - [`extract`] - HTML text extraction with fallback strategies
//! - [`chunk`] - Passage chunking
//! - [`rank`] - Embedding-based ranking
//! - [`summarize`] - Extractive summarization
//! - [`testing`] - Mock implementations for testing

pub mod chunk;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod rank;
pub mod resolver;
pub mod summarize;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::ResearchConfig;
pub use error::{ResearchError, Result};
pub use fetch::{FetchOutcome, FetchSkip, PageFetcher};
pub use traits::{
    embedder::{init_shared_embedder, shared_embedder, Embedder, HttpEmbedder},
    searcher::{DuckDuckGoSearcher, MockWebSearcher, SearchResult, WebSearcher},
};
pub use types::{Passage, ResearchResult, ScoredPassage};

// Re-export the pipeline
pub use pipeline::{run_research, Research};

// Re-export stage functions for callers that assemble their own pipeline
pub use chunk::chunk_words;
pub use extract::extract_text;
pub use rank::{cosine_similarity, rank_passages};
pub use resolver::resolve;
pub use summarize::{split_sentences, summarize};

// Re-export testing utilities
pub use testing::MockEmbedder;
