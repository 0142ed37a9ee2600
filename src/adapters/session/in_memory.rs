//! In-memory session registry.
//!
//! Sessions live for the lifetime of the process. Not shared across
//! server instances.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{SenderId, SessionId};
use crate::ports::SessionRegistry;

/// Sender → session map behind an async read/write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRegistry {
    sessions: Arc<RwLock<HashMap<SenderId, SessionId>>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn ensure_session(&self, sender: &SenderId) -> SessionId {
        if let Some(existing) = self.sessions.read().await.get(sender) {
            return *existing;
        }

        // Re-check under the write lock: another task may have inserted
        // between the two acquisitions.
        let mut sessions = self.sessions.write().await;
        *sessions.entry(sender.clone()).or_insert_with(|| {
            let session = SessionId::new();
            tracing::info!(sender = %sender, session = %session, "Created conversation session");
            session
        })
    }

    async fn get(&self, sender: &SenderId) -> Option<SessionId> {
        self.sessions.read().await.get(sender).copied()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
