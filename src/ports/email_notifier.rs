//! Email notification port.

use async_trait::async_trait;
use thiserror::Error;

/// Port for sending notification emails when a flow completes.
#[async_trait]
pub trait EmailNotifier: Send + Sync {
    async fn notify(&self, notification: EmailNotification) -> Result<(), EmailError>;
}

/// A plain-text notification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailNotification {
    pub to: String,
    /// Set to the end user's address so staff can answer directly.
    pub reply_to: Option<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Email provider rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
}
