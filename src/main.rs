//! switchboard - keyword-routed conversational agent
//!
//! Classifies each chat message into a retrieval handler (Wikipedia lookup,
//! browser web search, SEO page scan) or direct conversation, merges the
//! retrieved context into the model call, and replies over a CLI REPL.

mod llm;
mod repl;
mod retrieval;
mod router;
mod runtime;
mod state_machine;

use llm::{ChatConfig, ModelRegistry};
use retrieval::{BrowserSearchAgent, PageInspector, RetrievalHandlers, WikipediaClient};
use runtime::{RegistryChatClient, TurnExecutor};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the chat transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchboard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ChatConfig::from_env();
    let registry = Arc::new(ModelRegistry::new(&config));

    if !registry.has_models() {
        return Err("No chat provider configured. Set ANTHROPIC_API_KEY or OPENAI_API_KEY.".into());
    }

    tracing::info!(
        models = ?registry.available_models(),
        default = %registry.default_model_id(),
        "Chat registry initialized"
    );

    // Collaborators are constructed once per process and injected; they are
    // reused read-only across turns.
    let chat = RegistryChatClient::new(
        Arc::clone(&registry),
        registry.default_model_id().to_string(),
    );
    let wiki = std::env::var("SWITCHBOARD_WIKI_BASE")
        .map_or_else(|_| WikipediaClient::new(), WikipediaClient::with_base_url);
    let handlers = RetrievalHandlers::new(
        Arc::new(wiki),
        Arc::new(BrowserSearchAgent::new()),
        Arc::new(PageInspector::new()),
    );

    let executor = TurnExecutor::new(chat, handlers);
    repl::run(&executor).await?;

    Ok(())
}
