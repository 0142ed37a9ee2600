//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `email` - Notification emails (Resend, logging)
//! - `http` - Axum webhook endpoints
//! - `messenger` - Graph Send API and the dry-run recorder
//! - `nlu` - Dialogflow detect-intent client and a scripted mock
//! - `session` - In-memory session registry

pub mod email;
pub mod http;
pub mod messenger;
pub mod nlu;
pub mod session;

pub use email::{LoggingEmailNotifier, ResendConfig, ResendEmailNotifier};
pub use messenger::{GraphApiConfig, GraphSendAdapter, RecordingSendAdapter};
pub use nlu::{DialogflowClient, DialogflowConfig, MockNluClient};
pub use session::InMemorySessionRegistry;
