//! Webhook error types for Messenger webhook handling.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur while accepting a Messenger webhook delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The `X-Hub-Signature-256` header was not sent.
    #[error("Missing signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The signature header is not `sha256=<hex>`.
    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),

    /// Failed to parse the JSON payload.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl WebhookError {
    /// HTTP status returned to the platform for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature
            | WebhookError::InvalidSignature
            | WebhookError::MalformedSignature(_) => StatusCode::FORBIDDEN,
            WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,
        }
    }
}
