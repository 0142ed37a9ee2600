//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SendAdapter` - Platform Send API (live or dry-run)
//! - `NluClient` - Natural-language-understanding service
//! - `EmailNotifier` - Notification emails for completed flows
//! - `SessionRegistry` - Sender → NLU session mapping

mod email_notifier;
mod nlu_client;
mod send_adapter;
mod session_registry;

pub use email_notifier::{EmailError, EmailNotification, EmailNotifier};
pub use nlu_client::{DetectIntentRequest, NluClient, NluError, QueryInput};
pub use send_adapter::{SendAdapter, SendError, SendReceipt};
pub use session_registry::SessionRegistry;
