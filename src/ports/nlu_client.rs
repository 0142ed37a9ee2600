//! NLU client port.
//!
//! Treated as a black-box request/response: a query for a session goes in,
//! a [`TurnResult`] comes out.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::TurnResult;
use crate::domain::foundation::SessionId;

/// Port for the natural-language-understanding service.
#[async_trait]
pub trait NluClient: Send + Sync {
    /// Runs one turn for the session.
    async fn detect_intent(&self, request: DetectIntentRequest) -> Result<TurnResult, NluError>;
}

/// One NLU request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectIntentRequest {
    pub session_id: SessionId,
    pub query: QueryInput,
}

impl DetectIntentRequest {
    pub fn new(session_id: SessionId, query: QueryInput) -> Self {
        Self { session_id, query }
    }
}

/// What the user (or a flow) sends to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// Free text typed by the user, or a quick-reply payload.
    Text(String),
    /// A named event that triggers an intent directly.
    Event(String),
}

impl QueryInput {
    pub fn text(text: impl Into<String>) -> Self {
        QueryInput::Text(text.into())
    }

    pub fn event(name: impl Into<String>) -> Self {
        QueryInput::Event(name.into())
    }
}

/// Errors from the NLU service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NluError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("NLU service rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed NLU response: {0}")]
    Parse(String),
}

impl NluError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
