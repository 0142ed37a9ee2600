//! Axum router configuration for the webhook endpoints.

use axum::{routing::get, Router};

use super::handlers::{index, receive_events, verify_subscription, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `GET /` - Liveness text
/// - `GET /webhook` - Subscription handshake (`hub.*` query)
/// - `POST /webhook` - Signed messaging events
///
/// `/webhook/` with a trailing slash is accepted as well.
pub fn webhook_routes() -> Router<WebhookAppState> {
    Router::new()
        .route("/", get(index))
        .route("/webhook", get(verify_subscription).post(receive_events))
        .route("/webhook/", get(verify_subscription).post(receive_events))
}

/// Create the webhook router with state applied.
pub fn webhook_router(state: WebhookAppState) -> Router {
    webhook_routes().with_state(state)
}
