//! Events that drive a turn forward

use crate::llm::{ChatMessage, CompletionErrorKind};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// A new user message arrived
    UserMessage { text: String },

    /// The selected retrieval handler finished. Retrieval failures arrive
    /// here too, already rendered as explanatory text.
    ContextReady { text: String },

    /// The completion collaborator produced the assistant reply
    ReplyReady { message: ChatMessage },

    /// The completion collaborator failed; fatal for the turn
    CompletionFailed {
        message: String,
        kind: CompletionErrorKind,
    },
}
