//! Effects produced by state transitions

use crate::router::RetrievalRequest;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the selected retrieval handler
    RunRetrieval { request: RetrievalRequest },

    /// Make a completion request from the current history + pending context
    RequestCompletion,

    /// Hand the finished reply back to the session driver
    EmitReply { text: String },
}
