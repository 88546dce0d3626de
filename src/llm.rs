//! Chat-completion provider abstraction
//!
//! Provides a common interface for the chat-completion collaborator.

mod anthropic;
mod error;
mod openai;
mod registry;
mod types;

pub use anthropic::AnthropicService;
pub use error::{CompletionError, CompletionErrorKind};
pub use openai::OpenAIService;
pub use registry::{ChatConfig, ModelRegistry};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ChatRole, Usage};

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for chat-completion providers
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for chat services
pub struct LoggingService {
    inner: Arc<dyn ChatService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn ChatService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl ChatService for LoggingService {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, CompletionError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "Completion request finished"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Completion request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
