//! The research pipeline - main entry point for the library.
//!
//! One query in, one [`ResearchResult`] out. Stages run strictly in
//! sequence, each consuming the prior stage's full output:
//! search -> fetch -> extract -> chunk -> embed -> rank -> summarize.
//! Per-URL failures are absorbed along the way; only a search-provider
//! failure (or a dead embedding backend) surfaces to the caller.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::chunk;
use crate::config::ResearchConfig;
use crate::error::{ResearchError, Result};
use crate::extract;
use crate::fetch::PageFetcher;
use crate::rank;
use crate::summarize;
use crate::traits::embedder::{shared_embedder, Embedder};
use crate::traits::searcher::{DuckDuckGoSearcher, WebSearcher};
use crate::types::{Passage, ResearchResult, ScoredPassage};

/// The research pipeline, generic over its two external-service seams.
///
/// # Example
///
/// ```rust,ignore
/// use research::{Research, DuckDuckGoSearcher, HttpEmbedder};
///
/// let embedder = HttpEmbedder::new(api_key, "https://api.openai.com/v1", "text-embedding-3-small");
/// let research = Research::new(DuckDuckGoSearcher::new(), embedder);
///
/// let result = research.run("capital of France").await?;
/// println!("{}", result.summary);
/// ```
pub struct Research<S: WebSearcher, E: Embedder> {
    searcher: S,
    embedder: E,
    fetcher: PageFetcher,
    config: ResearchConfig,
}

impl<S: WebSearcher, E: Embedder> Research<S, E> {
    /// Create a new pipeline with default configuration.
    pub fn new(searcher: S, embedder: E) -> Self {
        Self::with_config(searcher, embedder, ResearchConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(searcher: S, embedder: E, config: ResearchConfig) -> Self {
        Self {
            searcher,
            embedder,
            fetcher: PageFetcher::new(&config),
            config,
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    /// Run the full pipeline for one query.
    ///
    /// Always returns either a populated result or a well-formed empty
    /// one; the only hard failures are an unusable search provider, an
    /// embedding backend error, and a blank query.
    pub async fn run(&self, query: &str) -> Result<ResearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResearchError::InvalidQuery {
                reason: "query must be non-empty".to_string(),
            });
        }

        let started = Instant::now();
        info!(query = %query, "research run starting");

        let hits = self
            .searcher
            .search(query, self.config.search_results)
            .await?;
        debug!(candidates = hits.len(), "search complete");

        let pool = self.collect_passages(&hits).await;

        if pool.is_empty() {
            info!(query = %query, "passage pool empty, returning empty result");
            return Ok(ResearchResult::empty(query));
        }

        let ranked = rank::rank_passages(
            &self.embedder,
            query,
            &pool,
            self.config.top_passages,
        )
        .await?;

        let passages: Vec<ScoredPassage> = ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (index, score))| ScoredPassage {
                passage: pool[index].clone(),
                score,
                rank,
            })
            .collect();

        let summary = passages
            .first()
            .map(|top| summarize::summarize(&top.passage, self.config.summary_sentences))
            .unwrap_or_default();

        let elapsed_seconds = started.elapsed().as_secs_f64();
        info!(
            query = %query,
            passages = passages.len(),
            elapsed_seconds,
            "research run complete"
        );

        Ok(ResearchResult {
            query: query.to_string(),
            passages,
            summary,
            elapsed_seconds,
        })
    }

    /// Fetch, extract, and chunk every candidate URL into the passage
    /// pool. Failures here are absorbed per URL, never propagated.
    async fn collect_passages(
        &self,
        hits: &[crate::traits::searcher::SearchResult],
    ) -> Vec<Passage> {
        let mut pool = Vec::new();

        for hit in hits {
            let url = hit.url.as_str();

            let Some(html) = self.fetcher.fetch(url).await.into_html() else {
                continue;
            };

            let text = extract::extract_text(&html);
            if text.is_empty() {
                debug!(url = %url, "no extractable text, page dropped");
                continue;
            }

            let chunks = chunk::chunk_words(&text, self.config.chunk_words);
            let kept = chunks.len().min(self.config.passages_per_page);
            debug!(url = %url, chunks = chunks.len(), kept, "page chunked");

            for chunk in chunks.into_iter().take(self.config.passages_per_page) {
                pool.push(Passage::new(url, chunk));
            }
        }

        pool
    }
}

/// Run one research query with the default stack: DuckDuckGo search and
/// the process-wide shared embedder.
///
/// Requires [`crate::traits::embedder::init_shared_embedder`] to have
/// been called.
pub async fn run_research(query: &str) -> Result<ResearchResult> {
    let embedder: Arc<dyn Embedder> = shared_embedder().ok_or_else(|| {
        ResearchError::Embedding("shared embedder not initialized".to_string())
    })?;

    Research::new(DuckDuckGoSearcher::new(), embedder)
        .run(query)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{spawn_page, spawn_unresponsive, MockEmbedder};
    use crate::traits::searcher::MockWebSearcher;

    const QUERY: &str = "capital of France";

    fn paris_html() -> &'static str {
        r#"
        <html><head><title>Paris</title></head><body>
            <nav><p>Home | About</p></nav>
            <p>Paris is the capital of France. It is located on the Seine.</p>
            <footer><p>Footer text</p></footer>
        </body></html>
        "#
    }

    #[tokio::test]
    async fn test_end_to_end_one_good_page_one_failure() {
        let url_a = spawn_page(paris_html(), "text/html; charset=utf-8", 200).await;
        let url_b = spawn_page("<p>server error</p>", "text/html", 500).await;

        let searcher =
            MockWebSearcher::new().with_urls(QUERY, &[url_a.as_str(), url_b.as_str()]);
        let embedder = MockEmbedder::new().with_dim(64);

        let research = Research::new(searcher, embedder);
        let result = research.run(QUERY).await.unwrap();

        // Only URL A contributes passages, capped per page.
        assert!(!result.passages.is_empty());
        assert!(result.passages.len() <= 4);
        assert!(result.passages.iter().all(|p| p.passage.source_url == url_a));

        // Top passage carries the maximum score; order is non-increasing.
        let scores: Vec<f32> = result.passages.iter().map(|p| p.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(result.passages[0].rank, 0);

        // Summary: first two sentences of URL A's text plus attribution.
        assert!(result
            .summary
            .starts_with("Paris is the capital of France. It is located on the Seine."));
        assert!(result.summary.ends_with(&format!("Source: {url_a}")));
        assert!(result.elapsed_seconds > 0.0);
    }

    #[tokio::test]
    async fn test_empty_pool_short_circuits_without_embedding() {
        let searcher = MockWebSearcher::new(); // no results for any query
        let embedder = MockEmbedder::new();
        let embedder_probe = embedder.clone();

        let research = Research::new(searcher, embedder);
        let result = research.run(QUERY).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.summary, "");
        assert_eq!(result.elapsed_seconds, 0.0);
        assert_eq!(embedder_probe.call_count(), 0);
    }

    #[tokio::test]
    async fn test_all_fetches_failing_yields_empty_result() {
        let url = spawn_page("not html at all", "text/plain", 200).await;
        let searcher = MockWebSearcher::new().with_urls(QUERY, &[url.as_str()]);
        let embedder = MockEmbedder::new();
        let embedder_probe = embedder.clone();

        let research = Research::new(searcher, embedder);
        let result = research.run(QUERY).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(embedder_probe.call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let research = Research::new(MockWebSearcher::new().failing(), MockEmbedder::new());
        let err = research.run(QUERY).await.unwrap_err();
        assert!(matches!(err, ResearchError::SearchUnavailable(_)));
    }

    #[tokio::test]
    async fn test_blank_query_is_invalid() {
        let research = Research::new(MockWebSearcher::new(), MockEmbedder::new());
        let err = research.run("   ").await.unwrap_err();
        assert!(matches!(err, ResearchError::InvalidQuery { .. }));
    }

    #[tokio::test]
    async fn test_unresponsive_page_does_not_hang_the_run() {
        let stuck = spawn_unresponsive().await;
        let good = spawn_page(paris_html(), "text/html", 200).await;

        let searcher =
            MockWebSearcher::new().with_urls(QUERY, &[stuck.as_str(), good.as_str()]);
        let config = ResearchConfig::default().with_fetch_timeout_secs(1);
        let research = Research::with_config(searcher, MockEmbedder::new().with_dim(64), config);

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            research.run(QUERY),
        )
        .await
        .expect("pipeline must not hang on an unresponsive page")
        .unwrap();

        assert!(result.passages.iter().all(|p| p.passage.source_url == good));
        assert!(!result.is_empty());
    }

    #[tokio::test]
    async fn test_passages_per_page_cap_keeps_leading_chunks() {
        // 10 words per chunk, 25 words of content -> 3 chunks, cap at 2.
        let words: Vec<String> = (0..25).map(|i| format!("word{i}")).collect();
        let html = format!("<p>{}</p>", words.join(" "));
        let url = spawn_page(&html, "text/html", 200).await;

        let searcher = MockWebSearcher::new().with_urls(QUERY, &[url.as_str()]);
        let config = ResearchConfig::default()
            .with_chunk_words(10)
            .with_passages_per_page(2);
        let research = Research::with_config(searcher, MockEmbedder::new(), config);

        let result = research.run(QUERY).await.unwrap();
        assert_eq!(result.passages.len(), 2);

        let texts: Vec<&str> = result
            .passages
            .iter()
            .map(|p| p.passage.text.as_str())
            .collect();
        // Both kept windows come from the start of the page.
        assert!(texts.iter().any(|t| t.starts_with("word0 ")));
        assert!(!texts.iter().any(|t| t.contains("word20")));
    }
}
