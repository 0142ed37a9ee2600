//! HTTP adapters - the webhook endpoints and the router stack around them.

pub mod webhook;

use std::time::Duration;

use ::http::HeaderName;
use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use webhook::{webhook_router, WebhookAppState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the full application router.
///
/// Wraps the webhook routes with request tracing, a request timeout, and an
/// `x-request-id` header that is generated when absent and echoed back.
pub fn app_router(state: WebhookAppState, request_timeout: Duration) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    webhook_router(state)
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
