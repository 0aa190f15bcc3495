//! Web searcher trait for candidate URL discovery.
//!
//! The pipeline's first stage asks an external search provider for pages
//! that might answer the query. This trait abstracts over providers;
//! provider relevance order is preserved but used only as fetch order,
//! never as the final ranking.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ResearchError, Result};
use crate::resolver;

/// A discovered URL from web search with metadata.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The discovered URL, already unwrapped from any redirect wrapper.
    pub url: Url,

    /// Title of the page (if available from search results).
    pub title: Option<String>,

    /// Snippet/description from search results.
    pub snippet: Option<String>,
}

impl SearchResult {
    /// Create a new search result from a URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            title: None,
            snippet: None,
        }
    }

    /// Create from a URL string.
    pub fn from_url(url: &str) -> Option<Self> {
        Url::parse(url).ok().map(Self::new)
    }

    /// Add a title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

/// Web search trait for candidate URL discovery.
///
/// A provider-level failure is the pipeline's one hard error; zero
/// results is an ordinary `Ok(vec![])`.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web for at most `max_results` URLs relevant to the query.
    ///
    /// Results lacking a retrievable URL are skipped, not errors.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// Mock web searcher for testing.
#[derive(Default)]
pub struct MockWebSearcher {
    results: std::sync::RwLock<std::collections::HashMap<String, Vec<SearchResult>>>,
    fail: bool,
}

impl MockWebSearcher {
    /// Create a new mock searcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results for a query.
    pub fn with_results(self, query: &str, results: Vec<SearchResult>) -> Self {
        self.results
            .write()
            .unwrap()
            .insert(query.to_string(), results);
        self
    }

    /// Add URL strings as results.
    pub fn with_urls(self, query: &str, urls: &[&str]) -> Self {
        let results: Vec<_> = urls
            .iter()
            .filter_map(|u| SearchResult::from_url(u))
            .collect();
        self.with_results(query, results)
    }

    /// Make every search fail with a provider-level error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        if self.fail {
            return Err(ResearchError::search_unavailable(std::io::Error::other(
                "mock search failure",
            )));
        }
        let mut results = self
            .results
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default();
        results.truncate(max_results);
        Ok(results)
    }
}

/// DuckDuckGo-backed web searcher.
///
/// Scrapes the HTML (non-JS) search endpoint and unwraps the provider's
/// redirect-wrapper links to their true destinations.
pub struct DuckDuckGoSearcher {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for DuckDuckGoSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearcher {
    /// Create a new DuckDuckGo searcher.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: "https://html.duckduckgo.com/html/".to_string(),
        }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Point at a different endpoint (for tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Pull result URLs out of the result-page HTML, in provider order.
    fn parse_result_urls(&self, html: &str, max_results: usize) -> Vec<SearchResult> {
        let document = Html::parse_document(html);

        // The endpoint has shipped both markups over time.
        let anchors = Selector::parse("a.result__a, .result__title a").unwrap();

        let mut results: Vec<SearchResult> = Vec::new();
        for anchor in document.select(&anchors) {
            if results.len() >= max_results {
                break;
            }

            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            // Result links are often scheme-relative.
            let absolute = if let Some(rest) = href.strip_prefix("//") {
                format!("https://{rest}")
            } else {
                href.to_string()
            };

            let destination = resolver::resolve(&absolute);
            let Ok(url) = Url::parse(&destination) else {
                debug!(href = %href, "skipping result without a parseable URL");
                continue;
            };

            if results.iter().any(|r| r.url == url) {
                continue;
            }

            let title = anchor.text().collect::<String>().trim().to_string();
            let mut result = SearchResult::new(url);
            if !title.is_empty() {
                result = result.with_title(title);
            }
            results.push(result);
        }

        results
    }
}

#[async_trait]
impl WebSearcher for DuckDuckGoSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        if max_results == 0 {
            return Ok(Vec::new());
        }

        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        debug!(query = %query, "dispatching web search");

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(ResearchError::search_unavailable)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "search provider returned an error status");
            return Err(ResearchError::search_unavailable(std::io::Error::other(
                format!("search provider returned HTTP {status}"),
            )));
        }

        let html = response
            .text()
            .await
            .map_err(ResearchError::search_unavailable)?;

        let results = self.parse_result_urls(&html, max_results);
        debug!(count = results.len(), "search results parsed");
        Ok(results)
    }
}
