//! Messenger Send API adapters.
//!
//! - `GraphSendAdapter` - Live Graph API delivery
//! - `RecordingSendAdapter` - Dry-run delivery that logs and records

mod graph_send_adapter;
mod recording_send_adapter;
pub mod wire;

pub use graph_send_adapter::{GraphApiConfig, GraphSendAdapter};
pub use recording_send_adapter::{RecordedSend, RecordingSendAdapter};
