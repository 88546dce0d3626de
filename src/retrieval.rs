//! Retrieval handlers
//!
//! Each handler turns a routed request into bounded context text for the
//! current turn. Handlers never fail: collaborator errors degrade to an
//! explanatory string that flows into the model context like any other
//! retrieval result.

mod search;
mod seo;
mod wiki;

pub use search::BrowserSearchAgent;
pub use seo::{extract_report, PageInspector, SeoReport};
pub use wiki::{WikiSummary, WikipediaClient};

use crate::router::RetrievalRequest;
use crate::runtime::traits::{PageFetcher, SearchAgent, WikiClient};
use std::sync::Arc;
use thiserror::Error;

/// Character cap for Wikipedia summaries
pub const WIKI_SUMMARY_CAP: usize = 1500;

/// Character cap for browser search summaries
pub const SEARCH_SUMMARY_CAP: usize = 500;

/// Errors from retrieval collaborators.
///
/// Recoverable by design: the handlers convert these into context text,
/// never into turn failures.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("unexpected status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The retrieval handlers behind one dispatch point.
///
/// From the dispatcher's point of view the three handlers are
/// interchangeable: each maps a request to context text.
pub struct RetrievalHandlers {
    wiki: Arc<dyn WikiClient>,
    search: Arc<dyn SearchAgent>,
    fetcher: Arc<dyn PageFetcher>,
}

impl RetrievalHandlers {
    pub fn new(
        wiki: Arc<dyn WikiClient>,
        search: Arc<dyn SearchAgent>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            wiki,
            search,
            fetcher,
        }
    }

    /// Produce context text for one routed request. Never fails.
    pub async fn produce(&self, request: &RetrievalRequest) -> String {
        match request {
            RetrievalRequest::WikiSearch { query } => {
                wiki::summarize(self.wiki.as_ref(), query).await
            }
            RetrievalRequest::BrowserSearch { query } => {
                search::summarize(self.search.as_ref(), query).await
            }
            RetrievalRequest::SeoAnalysis { target } => {
                seo::inspect(self.fetcher.as_ref(), target).await
            }
        }
    }
}

/// Truncate to at most `max_chars` characters, always on a char boundary.
pub(crate) fn truncate_chars(s: String, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let mut truncated = s;
            truncated.truncate(idx);
            truncated
        }
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_chars_short_string_untouched() {
        assert_eq!(truncate_chars("hello".to_string(), 10), "hello");
        assert_eq!(truncate_chars("hello".to_string(), 5), "hello");
    }

    #[test]
    fn truncate_chars_cuts_at_cap() {
        assert_eq!(truncate_chars("hello world".to_string(), 5), "hello");
    }

    #[test]
    fn truncate_chars_counts_characters_not_bytes() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("こんにちは".to_string(), 2), "こん");
    }

    #[test]
    fn truncate_chars_empty_input() {
        assert_eq!(truncate_chars(String::new(), 5), "");
        assert_eq!(truncate_chars("abc".to_string(), 0), "");
    }
}
