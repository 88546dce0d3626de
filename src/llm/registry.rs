//! Model registry for managing available chat providers

use super::anthropic::AnthropicModel;
use super::openai::OpenAIModel;
use super::{AnthropicService, ChatService, LoggingService, OpenAIService};
use std::collections::HashMap;
use std::sync::Arc;

/// Configuration for chat providers
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    /// Default model ID
    pub default_model: Option<String>,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            default_model: std::env::var("DEFAULT_MODEL").ok(),
        }
    }
}

/// Registry of available chat models
pub struct ModelRegistry {
    services: HashMap<String, Arc<dyn ChatService>>,
    default_model: String,
}

impl ModelRegistry {
    pub fn new(config: &ChatConfig) -> Self {
        let mut services: HashMap<String, Arc<dyn ChatService>> = HashMap::new();

        if let Some(key) = config.openai_api_key.as_deref().filter(|k| !k.is_empty()) {
            for model in [OpenAIModel::Gpt4, OpenAIModel::Gpt4o, OpenAIModel::Gpt4oMini] {
                services.insert(
                    model.model_id().to_string(),
                    Arc::new(LoggingService::new(Arc::new(OpenAIService::new(
                        key.to_string(),
                        model,
                    )))),
                );
            }
        }

        if let Some(key) = config.anthropic_api_key.as_deref().filter(|k| !k.is_empty()) {
            for model in [AnthropicModel::Claude45Sonnet, AnthropicModel::Claude45Haiku] {
                services.insert(
                    model.model_id().to_string(),
                    Arc::new(LoggingService::new(Arc::new(AnthropicService::new(
                        key.to_string(),
                        model,
                    )))),
                );
            }
        }

        // Preferred defaults, in order
        const PREFERRED: &[&str] = &["gpt-4", "claude-4.5-sonnet"];

        let default_model = config
            .default_model
            .clone()
            .or_else(|| {
                PREFERRED
                    .iter()
                    .find(|id| services.contains_key(**id))
                    .map(ToString::to_string)
            })
            .or_else(|| {
                let mut ids: Vec<_> = services.keys().cloned().collect();
                ids.sort();
                ids.into_iter().next()
            })
            .unwrap_or_else(|| "gpt-4".to_string());

        Self {
            services,
            default_model,
        }
    }

    /// Get a model by ID
    pub fn get(&self, model_id: &str) -> Option<Arc<dyn ChatService>> {
        self.services.get(model_id).cloned()
    }

    /// Get the default model
    pub fn default(&self) -> Option<Arc<dyn ChatService>> {
        self.get(&self.default_model)
    }

    /// Get the default model ID
    pub fn default_model_id(&self) -> &str {
        &self.default_model
    }

    /// List all available model IDs
    pub fn available_models(&self) -> Vec<String> {
        let mut models: Vec<_> = self.services.keys().cloned().collect();
        models.sort();
        models
    }

    /// Check if any models are available
    pub fn has_models(&self) -> bool {
        !self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_keys_no_models() {
        let config = ChatConfig::default();
        let registry = ModelRegistry::new(&config);
        assert!(registry.available_models().is_empty());
        assert!(!registry.has_models());
    }

    #[test]
    fn openai_key_only_openai_models() {
        let config = ChatConfig {
            openai_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);

        let models = registry.available_models();
        assert!(!models.is_empty());
        for model_id in &models {
            assert!(
                model_id.contains("gpt"),
                "Expected gpt model, got {model_id}"
            );
        }
    }

    #[test]
    fn anthropic_key_only_anthropic_models() {
        let config = ChatConfig {
            anthropic_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);

        let models = registry.available_models();
        assert!(!models.is_empty());
        for model_id in &models {
            assert!(
                model_id.contains("claude"),
                "Expected claude model, got {model_id}"
            );
        }
    }

    #[test]
    fn default_model_prefers_gpt4() {
        let config = ChatConfig {
            openai_api_key: Some("test-key".to_string()),
            anthropic_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), "gpt-4");
    }

    #[test]
    fn anthropic_only_falls_back_to_claude_default() {
        let config = ChatConfig {
            anthropic_api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), "claude-4.5-sonnet");
    }

    #[test]
    fn custom_default_model() {
        let config = ChatConfig {
            openai_api_key: Some("test-key".to_string()),
            default_model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert_eq!(registry.default_model_id(), "gpt-4o-mini");
        assert!(registry.default().is_some());
    }

    #[test]
    fn empty_key_is_ignored() {
        let config = ChatConfig {
            openai_api_key: Some(String::new()),
            ..Default::default()
        };
        let registry = ModelRegistry::new(&config);
        assert!(!registry.has_models());
    }
}
