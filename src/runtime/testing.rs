//! Mock implementations for testing
//!
//! These mocks enable turn-level testing without real I/O.

use super::traits::{ChatClient, PageFetcher, SearchAgent, WikiClient};
use crate::llm::{ChatRequest, ChatResponse, CompletionError};
use crate::retrieval::{RetrievalError, WikiSummary};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// Mock Chat Client
// ============================================================================

/// Mock chat client that returns queued responses
pub struct MockChatClient {
    responses: Mutex<VecDeque<Result<ChatResponse, CompletionError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful response
    pub fn queue_response(&self, response: ChatResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: CompletionError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Mock Retrieval Collaborators
// ============================================================================

enum MockOutcome<T> {
    Ok(T),
    Err(String),
}

impl<T: Clone> MockOutcome<T> {
    fn resolve(&self, wrap: impl FnOnce(String) -> RetrievalError) -> Result<T, RetrievalError> {
        match self {
            MockOutcome::Ok(value) => Ok(value.clone()),
            MockOutcome::Err(message) => Err(wrap(message.clone())),
        }
    }
}

/// Mock Wikipedia client with a fixed outcome
pub struct MockWikiClient {
    outcome: MockOutcome<WikiSummary>,
    /// Topics looked up so far
    pub lookups: Mutex<Vec<String>>,
}

impl MockWikiClient {
    pub fn found(summary: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Ok(WikiSummary::found(summary)),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            outcome: MockOutcome::Ok(WikiSummary::not_found()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Err(message.into()),
            lookups: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WikiClient for MockWikiClient {
    async fn lookup(&self, topic: &str) -> Result<WikiSummary, RetrievalError> {
        self.lookups.lock().unwrap().push(topic.to_string());
        self.outcome.resolve(RetrievalError::Network)
    }
}

/// Mock search agent with a fixed outcome
pub struct MockSearchAgent {
    outcome: MockOutcome<String>,
    /// Queries searched so far
    pub queries: Mutex<Vec<String>>,
}

impl MockSearchAgent {
    pub fn returning(summary: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Ok(summary.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Err(message.into()),
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchAgent for MockSearchAgent {
    async fn search_and_summarize(&self, query: &str) -> Result<String, RetrievalError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.resolve(RetrievalError::Browser)
    }
}

/// Mock page fetcher with a fixed outcome
pub struct MockPageFetcher {
    outcome: MockOutcome<String>,
    /// URLs fetched so far
    pub fetches: Mutex<Vec<String>>,
}

impl MockPageFetcher {
    pub fn returning(html: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Ok(html.into()),
            fetches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Err(message.into()),
            fetches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        self.fetches.lock().unwrap().push(url.to_string());
        self.outcome.resolve(RetrievalError::Network)
    }
}
