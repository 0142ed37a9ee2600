//! Session registry port.
//!
//! Maps each sender to the conversation session the NLU service tracks
//! them under. Sessions are created on first contact and never expire.

use async_trait::async_trait;

use crate::domain::foundation::{SenderId, SessionId};

/// Port for the sender → session mapping.
///
/// Implementations must make first-contact creation atomic: concurrent
/// calls for the same sender always observe the same id.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Returns the sender's session, creating it on first contact.
    async fn ensure_session(&self, sender: &SenderId) -> SessionId;

    /// Looks up a session without creating one.
    async fn get(&self, sender: &SenderId) -> Option<SessionId>;

    /// Number of known senders.
    async fn len(&self) -> usize;
}
