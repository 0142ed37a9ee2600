//! Domain layer containing the relay's business logic and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared identifiers (sender, session)
//! - `conversation` - NLU turn results and reply items
//! - `dispatch` - Sequencing of reply items into paced outbound sends
//! - `messenger` - Inbound webhook payloads and signature verification

pub mod conversation;
pub mod dispatch;
pub mod foundation;
pub mod messenger;
