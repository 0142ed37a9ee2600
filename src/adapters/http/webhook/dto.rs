//! HTTP DTOs for the webhook endpoints.

use serde::{Deserialize, Serialize};

/// Query string of the subscription handshake
/// (`GET /webhook?hub.mode=subscribe&hub.verify_token=...&hub.challenge=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifySubscriptionQuery {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

impl VerifySubscriptionQuery {
    /// Returns the challenge to echo when the handshake is valid.
    pub fn accepted_challenge(&self, expected_token: &str) -> Option<&str> {
        match (&self.mode, &self.verify_token) {
            (Some(mode), Some(token)) if mode == "subscribe" && token == expected_token => {
                Some(self.challenge.as_deref().unwrap_or_default())
            }
            _ => None,
        }
    }
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
