//! Message router
//!
//! Pure classification of the latest user message into a handler. Routing is
//! total and deterministic: every input maps to exactly one `Route`, and the
//! first matching rule wins.

use serde::{Deserialize, Serialize};

/// Interrogative tokens that send a message to the Wikipedia handler
const QUESTION_WORDS: &[&str] = &["what", "who", "where", "when", "why", "how"];

/// A retrieval task extracted from a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetrievalRequest {
    /// Wikipedia summary lookup for the full message text
    WikiSearch { query: String },
    /// Browser-driven web search, first result only
    BrowserSearch { query: String },
    /// SEO scan of a single page
    SeoAnalysis { target: String },
}

/// Routing decision for one user message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Enrich the turn with retrieved context before replying
    Retrieve(RetrievalRequest),
    /// Reply directly from conversation history
    Conversation,
}

/// Classify a user message.
///
/// Precedence, first match wins:
/// 1. `search` prefix -> browser search with the trimmed remainder as query
/// 2. `seo` prefix -> SEO scan of the trimmed remainder (scheme added if absent)
/// 3. any interrogative token as substring -> Wikipedia lookup of the whole message
/// 4. otherwise -> direct conversation
pub fn route(message: &str) -> Route {
    if let Some(rest) = strip_prefix_ignore_case(message, "search") {
        return Route::Retrieve(RetrievalRequest::BrowserSearch {
            query: rest.trim().to_string(),
        });
    }

    if let Some(rest) = strip_prefix_ignore_case(message, "seo") {
        let target = rest.trim();
        let has_scheme = strip_prefix_ignore_case(target, "http://").is_some()
            || strip_prefix_ignore_case(target, "https://").is_some();
        let target = if has_scheme {
            target.to_string()
        } else {
            format!("https://{target}")
        };
        return Route::Retrieve(RetrievalRequest::SeoAnalysis { target });
    }

    let lower = message.to_lowercase();
    if QUESTION_WORDS.iter().any(|word| lower.contains(word)) {
        return Route::Retrieve(RetrievalRequest::WikiSearch {
            query: message.to_string(),
        });
    }

    Route::Conversation
}

/// ASCII case-insensitive prefix strip. Returns the remainder (possibly empty)
/// when `message` starts with `prefix`.
fn strip_prefix_ignore_case<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let bytes = message.as_bytes();
    if bytes.len() < prefix.len() {
        return None;
    }
    if !bytes[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes()) {
        return None;
    }
    // The matched prefix is pure ASCII, so the boundary is always valid.
    message.get(prefix.len()..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_prefix_routes_to_browser_search() {
        assert_eq!(
            route("search penguins"),
            Route::Retrieve(RetrievalRequest::BrowserSearch {
                query: "penguins".to_string()
            })
        );
    }

    #[test]
    fn search_prefix_is_case_insensitive() {
        assert_eq!(
            route("Search rust tutorials"),
            Route::Retrieve(RetrievalRequest::BrowserSearch {
                query: "rust tutorials".to_string()
            })
        );
    }

    #[test]
    fn bare_search_yields_empty_query() {
        assert_eq!(
            route("search"),
            Route::Retrieve(RetrievalRequest::BrowserSearch {
                query: String::new()
            })
        );
    }

    #[test]
    fn seo_prefix_prepends_scheme() {
        assert_eq!(
            route("seo example.com"),
            Route::Retrieve(RetrievalRequest::SeoAnalysis {
                target: "https://example.com".to_string()
            })
        );
    }

    #[test]
    fn seo_prefix_keeps_existing_scheme() {
        assert_eq!(
            route("seo http://example.com"),
            Route::Retrieve(RetrievalRequest::SeoAnalysis {
                target: "http://example.com".to_string()
            })
        );
        assert_eq!(
            route("seo https://example.com/page"),
            Route::Retrieve(RetrievalRequest::SeoAnalysis {
                target: "https://example.com/page".to_string()
            })
        );
    }

    #[test]
    fn question_word_routes_to_wiki() {
        assert_eq!(
            route("What is quantum computing?"),
            Route::Retrieve(RetrievalRequest::WikiSearch {
                query: "What is quantum computing?".to_string()
            })
        );
    }

    #[test]
    fn question_word_matches_as_substring() {
        // "somehow" contains "how"
        assert!(matches!(
            route("somehow it works"),
            Route::Retrieve(RetrievalRequest::WikiSearch { .. })
        ));
    }

    #[test]
    fn plain_message_routes_to_conversation() {
        assert_eq!(route("Hello!"), Route::Conversation);
        assert_eq!(route(""), Route::Conversation);
    }

    #[test]
    fn search_prefix_wins_over_question_word() {
        // Matches rule 1 and rule 3; first match wins.
        assert_eq!(
            route("search who is Marie Curie"),
            Route::Retrieve(RetrievalRequest::BrowserSearch {
                query: "who is Marie Curie".to_string()
            })
        );
    }

    #[test]
    fn seo_prefix_matches_literally() {
        // "seoul" starts with the literal prefix; preserved behavior.
        assert_eq!(
            route("seoul tonight"),
            Route::Retrieve(RetrievalRequest::SeoAnalysis {
                target: "https://ul tonight".to_string()
            })
        );
    }

    #[test]
    fn route_is_deterministic() {
        let inputs = ["search rust", "seo a.com", "what is this", "hi", ""];
        for input in inputs {
            assert_eq!(route(input), route(input));
        }
    }
}
