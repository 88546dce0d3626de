//! Pure state transition function
//!
//! The per-turn pipeline is strictly linear:
//! `AwaitingRoute -> Retrieving -> Responding -> AwaitingInput`, with a
//! short-circuit straight to `Responding` when the router selects direct
//! conversation. Exactly one retrieval handler (or none) runs per turn.

use super::{ConversationState, Effect, Event, Phase};
use crate::llm::{ChatMessage, CompletionErrorKind};
use crate::router::{route, Route};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConversationState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConversationState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that abort a turn
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("empty user message")]
    EmptyMessage,

    #[error("completion failed: {message}")]
    Completion {
        message: String,
        kind: CompletionErrorKind,
    },

    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// Given the same state and event it always produces the same result, with
/// no I/O. Retrieval failures never surface here; they arrive as
/// `ContextReady` text. Only a completion failure aborts the turn.
pub fn transition(
    state: &ConversationState,
    event: Event,
) -> Result<TransitionResult, TurnError> {
    match (&state.phase, event) {
        // New user message while resting between turns: append it and route.
        (Phase::AwaitingRoute | Phase::AwaitingInput, Event::UserMessage { text }) => {
            let mut next = state.clone();
            next.history.push(ChatMessage::user(text.clone()));

            match route(&text) {
                Route::Retrieve(request) => {
                    next.phase = Phase::Retrieving {
                        request: request.clone(),
                    };
                    Ok(TransitionResult::new(next).with_effect(Effect::RunRetrieval { request }))
                }
                Route::Conversation => {
                    next.phase = Phase::Responding;
                    Ok(TransitionResult::new(next).with_effect(Effect::RequestCompletion))
                }
            }
        }

        // Retrieval finished: stash context, move on to the completion call.
        // Always: errors were rendered into the text upstream.
        (Phase::Retrieving { .. }, Event::ContextReady { text }) => {
            let mut next = state.clone();
            next.pending_context = Some(text);
            next.phase = Phase::Responding;
            Ok(TransitionResult::new(next).with_effect(Effect::RequestCompletion))
        }

        // Reply arrived: commit it, drop the transient context, rest.
        (Phase::Responding, Event::ReplyReady { message }) => {
            let mut next = state.clone();
            let reply_text = message.text.clone();
            next.history.push(message);
            next.pending_context = None;
            next.phase = Phase::AwaitingInput;
            Ok(TransitionResult::new(next).with_effect(Effect::EmitReply { text: reply_text }))
        }

        // Completion failure is the one fatal outcome of a turn.
        (Phase::Responding, Event::CompletionFailed { message, kind }) => {
            Err(TurnError::Completion { message, kind })
        }

        (phase, event) => Err(TurnError::InvalidTransition(format!(
            "event {event:?} not valid in phase {phase:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RetrievalRequest;

    fn user_message(text: &str) -> Event {
        Event::UserMessage {
            text: text.to_string(),
        }
    }

    #[test]
    fn question_message_enters_retrieving() {
        let state = ConversationState::new();
        let result = transition(&state, user_message("What is the Eiffel Tower?")).unwrap();

        assert_eq!(result.new_state.history.len(), 1);
        assert!(matches!(
            result.new_state.phase,
            Phase::Retrieving {
                request: RetrievalRequest::WikiSearch { .. }
            }
        ));
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(&result.effects[0], Effect::RunRetrieval { .. }));
    }

    #[test]
    fn plain_message_short_circuits_to_responding() {
        let state = ConversationState::new();
        let result = transition(&state, user_message("Hello!")).unwrap();

        assert_eq!(result.new_state.phase, Phase::Responding);
        assert_eq!(result.effects, vec![Effect::RequestCompletion]);
    }

    #[test]
    fn context_ready_moves_to_responding() {
        let mut state = ConversationState::new();
        state.history.push(ChatMessage::user("what is rust"));
        state.phase = Phase::Retrieving {
            request: RetrievalRequest::WikiSearch {
                query: "what is rust".to_string(),
            },
        };

        let result = transition(
            &state,
            Event::ContextReady {
                text: "Rust is a systems language.".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            result.new_state.pending_context.as_deref(),
            Some("Rust is a systems language.")
        );
        assert_eq!(result.new_state.phase, Phase::Responding);
        assert_eq!(result.effects, vec![Effect::RequestCompletion]);
    }

    #[test]
    fn reply_commits_history_and_clears_context() {
        let mut state = ConversationState::new();
        state.history.push(ChatMessage::user("what is rust"));
        state.pending_context = Some("Rust is a systems language.".to_string());
        state.phase = Phase::Responding;

        let result = transition(
            &state,
            Event::ReplyReady {
                message: ChatMessage::assistant("Rust is great."),
            },
        )
        .unwrap();

        assert_eq!(result.new_state.history.len(), 2);
        assert_eq!(result.new_state.pending_context, None);
        assert_eq!(result.new_state.phase, Phase::AwaitingInput);
        assert_eq!(
            result.effects,
            vec![Effect::EmitReply {
                text: "Rust is great.".to_string()
            }]
        );
    }

    #[test]
    fn completion_failure_is_fatal() {
        let mut state = ConversationState::new();
        state.history.push(ChatMessage::user("hi"));
        state.phase = Phase::Responding;

        let err = transition(
            &state,
            Event::CompletionFailed {
                message: "quota exceeded".to_string(),
                kind: CompletionErrorKind::RateLimit,
            },
        )
        .unwrap_err();

        assert!(matches!(err, TurnError::Completion { .. }));
    }

    #[test]
    fn user_message_rejected_mid_turn() {
        let mut state = ConversationState::new();
        state.history.push(ChatMessage::user("hi"));
        state.phase = Phase::Responding;

        let err = transition(&state, user_message("another")).unwrap_err();
        assert!(matches!(err, TurnError::InvalidTransition(_)));
    }

    #[test]
    fn user_message_accepted_after_a_turn() {
        let mut state = ConversationState::new();
        state.history.push(ChatMessage::user("hi"));
        state.history.push(ChatMessage::assistant("hello"));
        state.phase = Phase::AwaitingInput;

        let result = transition(&state, user_message("search cats")).unwrap();
        assert_eq!(result.new_state.history.len(), 3);
        assert!(matches!(
            result.new_state.phase,
            Phase::Retrieving {
                request: RetrievalRequest::BrowserSearch { .. }
            }
        ));
    }
}
