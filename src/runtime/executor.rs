//! Turn executor
//!
//! Drives one full turn through the state machine: applies events via the
//! pure transition function, executes the resulting effects against the
//! collaborators, and commits the new conversation state only when the turn
//! reaches a reply. A completion failure leaves the caller's state untouched
//! so the session driver can retry or drop the turn.

use super::traits::ChatClient;
use crate::llm::{ChatMessage, ChatRequest};
use crate::retrieval::RetrievalHandlers;
use crate::state_machine::{transition, ConversationState, Effect, Event, TurnError};

const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Runs turns for one session against injected collaborators
pub struct TurnExecutor<C: ChatClient> {
    chat: C,
    handlers: RetrievalHandlers,
    session_id: String,
}

impl<C: ChatClient> TurnExecutor<C> {
    pub fn new(chat: C, handlers: RetrievalHandlers) -> Self {
        Self {
            chat,
            handlers,
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Execute one turn: user input in, assistant reply out.
    ///
    /// The turn runs against a staged copy of `state`; the copy is committed
    /// back only on success, so a fatal error leaves the pre-turn state
    /// intact (pending context uncommitted, phase unchanged).
    pub async fn run_turn(
        &self,
        state: &mut ConversationState,
        input: &str,
    ) -> Result<String, TurnError> {
        if input.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let mut staged = state.clone();
        let mut reply = None;

        let mut pending = vec![Event::UserMessage {
            text: input.to_string(),
        }];

        while let Some(event) = pending.pop() {
            let result = transition(&staged, event)?;
            staged = result.new_state;

            for effect in result.effects {
                if let Some(generated) = self.execute_effect(&staged, effect, &mut reply).await {
                    pending.push(generated);
                }
            }
        }

        let reply = reply.ok_or_else(|| {
            TurnError::InvalidTransition("turn finished without a reply".to_string())
        })?;

        *state = staged;
        Ok(reply)
    }

    async fn execute_effect(
        &self,
        staged: &ConversationState,
        effect: Effect,
        reply: &mut Option<String>,
    ) -> Option<Event> {
        match effect {
            Effect::RunRetrieval { request } => {
                tracing::info!(
                    session_id = %self.session_id,
                    request = ?request,
                    "Running retrieval handler"
                );
                let text = self.handlers.produce(&request).await;
                Some(Event::ContextReady { text })
            }

            Effect::RequestCompletion => {
                let request = self.build_request(staged);
                match self.chat.complete(&request).await {
                    Ok(response) => Some(Event::ReplyReady {
                        message: response.message,
                    }),
                    Err(e) => Some(Event::CompletionFailed {
                        message: e.message,
                        kind: e.kind,
                    }),
                }
            }

            Effect::EmitReply { text } => {
                *reply = Some(text);
                None
            }
        }
    }

    /// Build the completion request: the committed history plus, when context
    /// was retrieved this turn, one synthetic user message that is never
    /// persisted.
    fn build_request(&self, staged: &ConversationState) -> ChatRequest {
        let mut messages = staged.history.clone();

        if let Some(context) = staged.pending_context.as_deref() {
            messages.push(ChatMessage::user(format!(
                "Here's some relevant information:\n{context}\n\n\
                 Please use this information to provide a detailed response."
            )));
        }

        ChatRequest {
            system: None,
            messages,
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        }
    }
}
