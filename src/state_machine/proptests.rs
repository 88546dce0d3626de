//! Property-based tests for routing and state transitions
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::{ConversationState, Phase};
use super::transition::transition;
use super::{Effect, Event};
use crate::llm::ChatMessage;
use crate::router::{route, RetrievalRequest, Route};
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_message() -> impl Strategy<Value = String> {
    // Mix of free-form text and inputs that exercise each routing rule
    prop_oneof![
        "[ -~]{0,60}",
        "search [a-z ]{0,30}",
        "seo [a-z.]{1,20}",
        "(what|who|where|when|why|how) [a-z ]{0,30}",
        Just(String::new()),
    ]
}

fn arb_retrieval_request() -> impl Strategy<Value = RetrievalRequest> {
    prop_oneof![
        "[a-z ]{1,30}".prop_map(|query| RetrievalRequest::WikiSearch { query }),
        "[a-z ]{0,30}".prop_map(|query| RetrievalRequest::BrowserSearch { query }),
        "[a-z.]{1,20}".prop_map(|target| RetrievalRequest::SeoAnalysis {
            target: format!("https://{target}")
        }),
    ]
}

fn arb_history() -> impl Strategy<Value = Vec<ChatMessage>> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z ]{1,20}".prop_map(ChatMessage::user),
            "[a-z ]{1,20}".prop_map(ChatMessage::assistant),
        ],
        0..6,
    )
}

fn arb_resting_state() -> impl Strategy<Value = ConversationState> {
    (arb_history(), any::<bool>()).prop_map(|(history, started)| ConversationState {
        history,
        pending_context: None,
        phase: if started {
            Phase::AwaitingInput
        } else {
            Phase::AwaitingRoute
        },
    })
}

// ============================================================================
// Router Properties
// ============================================================================

proptest! {
    /// The router is total: every input maps to a route without panicking.
    #[test]
    fn route_is_total(message in arb_message()) {
        let _ = route(&message);
    }

    /// Same input, same route: no hidden state.
    #[test]
    fn route_is_deterministic(message in arb_message()) {
        prop_assert_eq!(route(&message), route(&message));
    }

    /// A `search`-prefixed message always selects the browser handler and the
    /// extracted query never carries surrounding whitespace.
    #[test]
    fn search_prefix_always_browser(query in "[ -~]{0,40}") {
        let message = format!("search{query}");
        match route(&message) {
            Route::Retrieve(RetrievalRequest::BrowserSearch { query: extracted }) => {
                prop_assert_eq!(extracted.trim(), extracted.as_str());
            }
            other => prop_assert!(false, "expected BrowserSearch, got {:?}", other),
        }
    }

    /// A wiki route always carries the full message as query.
    #[test]
    fn wiki_query_is_full_message(tail in "[a-z ]{0,30}") {
        let message = format!("what {tail}");
        match route(&message) {
            Route::Retrieve(RetrievalRequest::WikiSearch { query }) => {
                prop_assert_eq!(query, message);
            }
            other => prop_assert!(false, "expected WikiSearch, got {:?}", other),
        }
    }
}

// ============================================================================
// Transition Properties
// ============================================================================

proptest! {
    /// A user message in a resting state always appends exactly one history
    /// entry and produces exactly one effect.
    #[test]
    fn user_message_appends_one_entry(state in arb_resting_state(), text in "[ -~]{1,40}") {
        let before = state.history.len();
        let result = transition(&state, Event::UserMessage { text }).unwrap();
        prop_assert_eq!(result.new_state.history.len(), before + 1);
        prop_assert_eq!(result.effects.len(), 1);
    }

    /// The transition function is pure: applying the same event to the same
    /// state twice yields identical new states.
    #[test]
    fn transition_is_pure(state in arb_resting_state(), text in "[ -~]{1,40}") {
        let a = transition(&state, Event::UserMessage { text: text.clone() }).unwrap();
        let b = transition(&state, Event::UserMessage { text }).unwrap();
        prop_assert_eq!(a.new_state, b.new_state);
        prop_assert_eq!(a.effects, b.effects);
    }

    /// Context delivery always lands in `Responding` with the context staged,
    /// regardless of which handler ran; handlers are interchangeable.
    #[test]
    fn context_ready_always_responds(
        request in arb_retrieval_request(),
        history in arb_history(),
        context in "[ -~]{0,80}",
    ) {
        let state = ConversationState {
            history,
            pending_context: None,
            phase: Phase::Retrieving { request },
        };
        let result = transition(&state, Event::ContextReady { text: context.clone() }).unwrap();
        prop_assert_eq!(result.new_state.pending_context, Some(context));
        prop_assert_eq!(result.new_state.phase, Phase::Responding);
        prop_assert_eq!(result.effects, vec![Effect::RequestCompletion]);
    }

    /// A committed reply always clears pending context and returns the
    /// conversation to `AwaitingInput`.
    #[test]
    fn reply_always_clears_context(
        history in arb_history(),
        context in proptest::option::of("[a-z ]{1,40}"),
        reply in "[a-z ]{1,40}",
    ) {
        let state = ConversationState {
            history,
            pending_context: context,
            phase: Phase::Responding,
        };
        let result = transition(
            &state,
            Event::ReplyReady {
                message: ChatMessage::assistant(reply),
            },
        )
        .unwrap();
        prop_assert_eq!(result.new_state.pending_context, None);
        prop_assert_eq!(result.new_state.phase, Phase::AwaitingInput);
    }
}
