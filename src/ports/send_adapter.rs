//! Send adapter port for outbound platform messages.
//!
//! One call per [`SendCommand`]. The dispatch scheduler calls it
//! fire-and-forget per unit and never inspects the outcome to reschedule
//! anything.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dispatch::SendCommand;

/// Port for delivering outbound messages to the platform.
#[async_trait]
pub trait SendAdapter: Send + Sync {
    /// Delivers one command.
    async fn send(&self, command: &SendCommand) -> Result<SendReceipt, SendError>;
}

/// What the platform answered for a successful send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub recipient_id: Option<String>,
    /// Absent for sender actions.
    pub message_id: Option<String>,
}

/// Errors from the send transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Send API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to parse Send API response: {0}")]
    Parse(String),
}

impl SendError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
