//! Best-effort page fetching.
//!
//! A fetch failure for a single URL must never abort the pipeline:
//! partial failure across N URLs degrades result quality, not
//! availability. [`PageFetcher::fetch`] therefore never returns `Err` —
//! every failure mode collapses to [`FetchOutcome::Skipped`] carrying a
//! [`FetchSkip`] reason, so causes stay inspectable for logging and
//! tests instead of being silently discarded.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::ResearchConfig;

/// Outcome of fetching one URL.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// A 2xx HTML response; carries the raw body.
    Html(String),

    /// The page was skipped; the reason says why.
    Skipped(FetchSkip),
}

impl FetchOutcome {
    /// The HTML body, if the fetch succeeded.
    pub fn into_html(self) -> Option<String> {
        match self {
            Self::Html(html) => Some(html),
            Self::Skipped(_) => None,
        }
    }
}

/// Why a page yielded no HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchSkip {
    /// Non-2xx HTTP status.
    Status(u16),

    /// Response was not HTML (carries the content-type, if any).
    NotHtml(Option<String>),

    /// The request did not complete within the configured timeout.
    Timeout,

    /// Connection or transport failure, including body read errors.
    Transport(String),
}

impl std::fmt::Display for FetchSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::NotHtml(Some(ct)) => write!(f, "non-HTML content type: {ct}"),
            Self::NotHtml(None) => write!(f, "missing content type"),
            Self::Timeout => write!(f, "timed out"),
            Self::Transport(reason) => write!(f, "transport error: {reason}"),
        }
    }
}

/// HTTP page fetcher with a bounded per-request timeout.
pub struct PageFetcher {
    client: reqwest::Client,
    user_agent: String,
}

impl PageFetcher {
    /// Build a fetcher from pipeline configuration.
    pub fn new(config: &ResearchConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.fetch_timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            user_agent: config.user_agent.clone(),
        }
    }

    /// Use a custom HTTP client (the builder-level timeout then governs).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Fetch one URL, returning its HTML body or a skip reason. Never fails.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        debug!(url = %url, "HTTP fetch starting");

        let response = match self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let skip = if e.is_timeout() {
                    FetchSkip::Timeout
                } else {
                    FetchSkip::Transport(e.to_string())
                };
                warn!(url = %url, reason = %skip, "page skipped");
                return FetchOutcome::Skipped(skip);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let skip = FetchSkip::Status(status.as_u16());
            warn!(url = %url, reason = %skip, "page skipped");
            return FetchOutcome::Skipped(skip);
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let is_html = content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(false);
        if !is_html {
            let skip = FetchSkip::NotHtml(content_type);
            debug!(url = %url, reason = %skip, "page skipped");
            return FetchOutcome::Skipped(skip);
        }

        match response.text().await {
            Ok(html) => {
                debug!(
                    url = %url,
                    bytes = html.len(),
                    fetched_at = %Utc::now(),
                    "page fetched"
                );
                FetchOutcome::Html(html)
            }
            Err(e) => {
                let skip = if e.is_timeout() {
                    FetchSkip::Timeout
                } else {
                    FetchSkip::Transport(e.to_string())
                };
                warn!(url = %url, reason = %skip, "page skipped");
                FetchOutcome::Skipped(skip)
            }
        }
    }
}
