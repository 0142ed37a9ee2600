//! HTTP adapter for the Messenger webhook.
//!
//! - `GET /` - Liveness text
//! - `GET /webhook` - Subscription handshake
//! - `POST /webhook` - Signed messaging events

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, VerifySubscriptionQuery};
pub use handlers::{WebhookApiError, WebhookAppState};
pub use routes::{webhook_router, webhook_routes};
