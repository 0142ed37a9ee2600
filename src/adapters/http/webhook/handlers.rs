//! HTTP handlers for the Messenger webhook.
//!
//! These handlers connect Axum routes to the relay command handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::ReceiveWebhookHandler;
use crate::domain::messenger::{MessengerSignatureVerifier, WebhookError, SIGNATURE_HEADER};

use super::dto::{ErrorResponse, VerifySubscriptionQuery};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state of the webhook endpoints.
#[derive(Clone)]
pub struct WebhookAppState {
    pub verifier: Arc<MessengerSignatureVerifier>,
    pub verify_token: Arc<str>,
    pub receive_handler: ReceiveWebhookHandler,
}

impl WebhookAppState {
    pub fn new(
        verifier: MessengerSignatureVerifier,
        verify_token: impl Into<String>,
        receive_handler: ReceiveWebhookHandler,
    ) -> Self {
        Self {
            verifier: Arc::new(verifier),
            verify_token: Arc::from(verify_token.into()),
            receive_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Liveness text
pub async fn index() -> &'static str {
    "Hello world, I am a chat bot"
}

/// GET /webhook - Subscription handshake
pub async fn verify_subscription(
    State(state): State<WebhookAppState>,
    Query(query): Query<VerifySubscriptionQuery>,
) -> Response {
    match query.accepted_challenge(&state.verify_token) {
        Some(challenge) => {
            tracing::info!("Webhook subscription validated");
            (StatusCode::OK, challenge.to_string()).into_response()
        }
        None => {
            tracing::warn!(
                mode = query.mode.as_deref().unwrap_or("-"),
                "Failed webhook validation, verify token mismatch"
            );
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST /webhook - Receive messaging events
///
/// Answers 200 as soon as the payload is verified; events are processed in
/// background tasks.
pub async fn receive_events(
    State(state): State<WebhookAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let payload = state.verifier.verify_and_parse(&body, signature)?;

    let spawned = state.receive_handler.handle(payload);
    tracing::debug!(events = spawned.event_count(), "Accepted webhook delivery");

    Ok(StatusCode::OK)
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts webhook errors to HTTP responses.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let error_code = match &self.0 {
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::InvalidSignature => "INVALID_SIGNATURE",
            WebhookError::MalformedSignature(_) => "MALFORMED_SIGNATURE",
            WebhookError::ParseError(_) => "INVALID_PAYLOAD",
        };

        tracing::warn!(status = status.as_u16(), error = %self.0, "Rejected webhook delivery");

        (status, Json(ErrorResponse::new(error_code, self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_errors_map_to_forbidden() {
        let response = WebhookApiError(WebhookError::InvalidSignature).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = WebhookApiError(WebhookError::MissingSignature).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn payload_errors_map_to_bad_request() {
        let response = WebhookApiError(WebhookError::ParseError("eof".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn index_says_hello() {
        assert_eq!(index().await, "Hello world, I am a chat bot");
    }
}
