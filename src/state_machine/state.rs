//! Conversation state types

use crate::llm::ChatMessage;
use crate::router::RetrievalRequest;
use serde::{Deserialize, Serialize};

/// Where a conversation sits within its current turn.
///
/// Transient: a phase never outlives the session, and between turns the
/// conversation always rests in `AwaitingInput`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Phase {
    /// Fresh conversation, first router run pending
    #[default]
    AwaitingRoute,

    /// A retrieval handler is producing context for this turn
    Retrieving { request: RetrievalRequest },

    /// Completion request pending
    Responding,

    /// Turn finished, waiting for the next user message
    AwaitingInput,
}

/// Conversation state, the only persistent entity.
///
/// Mutated in place by the dispatcher once per turn; discarded at session end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConversationState {
    /// Ordered message history; insertion order defines the model context
    pub history: Vec<ChatMessage>,
    /// Retrieved text to merge into the next completion call.
    /// `Some` only between a retrieval handler completing and the
    /// conversation handler consuming it.
    pub pending_context: Option<String>,
    /// Current position within the turn
    pub phase: Phase,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with pre-existing history.
    #[allow(dead_code)] // For session drivers that seed history
    pub fn seeded(history: Vec<ChatMessage>) -> Self {
        Self {
            history,
            pending_context: None,
            phase: Phase::AwaitingRoute,
        }
    }
}
