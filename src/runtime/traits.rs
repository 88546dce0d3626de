//! Trait abstractions for collaborator I/O
//!
//! The core depends on external capabilities only through these seams, which
//! keeps the dispatcher testable with mock implementations and the
//! collaborators swappable at session start.

use crate::llm::{ChatRequest, ChatResponse, CompletionError};
use crate::retrieval::{RetrievalError, WikiSummary};
use async_trait::async_trait;
use std::sync::Arc;

/// Chat-completion capability
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Complete a conversation into the next assistant message
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Wikipedia lookup capability
#[async_trait]
pub trait WikiClient: Send + Sync {
    /// Look up a topic. A missing topic is not an error (`found = false`);
    /// only transport failures return `Err`.
    async fn lookup(&self, topic: &str) -> Result<WikiSummary, RetrievalError>;
}

/// Web search-and-summarize capability
#[async_trait]
pub trait SearchAgent: Send + Sync {
    /// Search the web and summarize the first result
    async fn search_and_summarize(&self, query: &str) -> Result<String, RetrievalError>;
}

/// Raw page fetch capability
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the HTML body for a URL
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        (**self).complete(request).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

#[async_trait]
impl<T: WikiClient + ?Sized> WikiClient for Arc<T> {
    async fn lookup(&self, topic: &str) -> Result<WikiSummary, RetrievalError> {
        (**self).lookup(topic).await
    }
}

#[async_trait]
impl<T: SearchAgent + ?Sized> SearchAgent for Arc<T> {
    async fn search_and_summarize(&self, query: &str) -> Result<String, RetrievalError> {
        (**self).search_and_summarize(query).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        (**self).fetch(url).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

use crate::llm::ModelRegistry;

/// Adapter to use the model registry as a `ChatClient`
pub struct RegistryChatClient {
    registry: Arc<ModelRegistry>,
    model_id: String,
}

impl RegistryChatClient {
    pub fn new(registry: Arc<ModelRegistry>, model_id: impl Into<String>) -> Self {
        Self {
            registry,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ChatClient for RegistryChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let service = self
            .registry
            .get(&self.model_id)
            .or_else(|| self.registry.default())
            .ok_or_else(|| CompletionError::unknown("No chat model available"))?;
        service.complete(request).await
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
