//! Wikipedia summary lookup

use super::{truncate_chars, RetrievalError, WIKI_SUMMARY_CAP};
use crate::runtime::traits::WikiClient;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1";

pub(crate) const NOT_FOUND_TEXT: &str = "No Wikipedia information found for this topic.";

/// Result of a topic lookup. A missing topic is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiSummary {
    pub found: bool,
    pub summary: String,
}

impl WikiSummary {
    pub fn found(summary: impl Into<String>) -> Self {
        Self {
            found: true,
            summary: summary.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            summary: String::new(),
        }
    }
}

/// Client for the Wikipedia REST summary endpoint
pub struct WikipediaClient {
    client: Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different endpoint (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// `{base}/page/summary/{title}` with the topic as one encoded segment.
    fn summary_url(&self, topic: &str) -> Result<Url, RetrievalError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| RetrievalError::Malformed(format!("bad base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| RetrievalError::Malformed("base url cannot be a base".to_string()))?
            .extend(["page", "summary"])
            .push(&topic.replace(' ', "_"));
        Ok(url)
    }
}

impl Default for WikipediaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WikiClient for WikipediaClient {
    async fn lookup(&self, topic: &str) -> Result<WikiSummary, RetrievalError> {
        let url = self.summary_url(topic)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(WikiSummary::not_found()),
            status if status.is_success() => {
                let page: SummaryResponse = response
                    .json()
                    .await
                    .map_err(|e| RetrievalError::Malformed(e.to_string()))?;
                Ok(WikiSummary::found(page.extract))
            }
            status => Err(RetrievalError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: String,
}

/// Produce context text for a wiki route. Never fails.
pub(crate) async fn summarize(wiki: &dyn WikiClient, query: &str) -> String {
    match wiki.lookup(query).await {
        Ok(summary) if summary.found => truncate_chars(summary.summary, WIKI_SUMMARY_CAP),
        Ok(_) => NOT_FOUND_TEXT.to_string(),
        Err(e) => format!("Error searching Wikipedia: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::testing::MockWikiClient;

    #[test]
    fn summary_url_encodes_topic() {
        let client = WikipediaClient::new();
        let url = client.summary_url("What is the Eiffel Tower?").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/api/rest_v1/page/summary/What_is_the_Eiffel_Tower%3F"
        );
    }

    #[tokio::test]
    async fn found_summary_is_capped() {
        let wiki = MockWikiClient::found("x".repeat(5000));
        let text = summarize(&wiki, "anything").await;
        assert_eq!(text.chars().count(), WIKI_SUMMARY_CAP);
    }

    #[tokio::test]
    async fn missing_topic_yields_fixed_text() {
        let wiki = MockWikiClient::not_found();
        let text = summarize(&wiki, "anything").await;
        assert_eq!(text, NOT_FOUND_TEXT);
    }

    #[tokio::test]
    async fn lookup_error_degrades_to_text() {
        let wiki = MockWikiClient::failing("connection reset");
        let text = summarize(&wiki, "anything").await;
        assert!(text.starts_with("Error searching Wikipedia:"));
        assert!(text.contains("connection reset"));
    }
}
