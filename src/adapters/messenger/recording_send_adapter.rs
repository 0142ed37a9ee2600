//! Dry-run send adapter.
//!
//! Logs and records every command instead of calling the Send API. Used
//! when the relay runs with `dry_run` enabled, and by tests that assert on
//! send order and timing.
//!
//! ```ignore
//! let recorder = RecordingSendAdapter::new();
//! recorder.fail_on("image");
//!
//! scheduler.dispatch(schedule).await.wait().await;
//! assert_eq!(recorder.kinds(), vec!["text", "generic_template"]);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::domain::dispatch::SendCommand;
use crate::ports::{SendAdapter, SendError, SendReceipt};

/// A command observed by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSend {
    /// Time since the recorder was created.
    pub at: Duration,
    pub command: SendCommand,
}

/// Send adapter that keeps every command in memory.
#[derive(Clone)]
pub struct RecordingSendAdapter {
    inner: Arc<Mutex<RecorderState>>,
    started: Instant,
}

#[derive(Default)]
struct RecorderState {
    sent: Vec<RecordedSend>,
    failing_kinds: HashSet<&'static str>,
}

impl Default for RecordingSendAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSendAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecorderState::default())),
            started: Instant::now(),
        }
    }

    /// Rejects every later command of the given kind (see [`SendCommand::kind`]).
    pub fn fail_on(&self, kind: &'static str) {
        self.state().failing_kinds.insert(kind);
    }

    /// Everything recorded so far, in send order.
    pub fn sent(&self) -> Vec<RecordedSend> {
        self.state().sent.clone()
    }

    pub fn commands(&self) -> Vec<SendCommand> {
        self.state().sent.iter().map(|s| s.command.clone()).collect()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.state().sent.iter().map(|s| s.command.kind()).collect()
    }

    /// Recorded commands excluding typing indicators.
    pub fn messages(&self) -> Vec<RecordedSend> {
        self.state()
            .sent
            .iter()
            .filter(|s| !matches!(s.command, SendCommand::SenderAction { .. }))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.state().sent.clear();
    }

    fn state(&self) -> MutexGuard<'_, RecorderState> {
        // A panicking test thread must not hide what was recorded.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SendAdapter for RecordingSendAdapter {
    async fn send(&self, command: &SendCommand) -> Result<SendReceipt, SendError> {
        let at = self.started.elapsed();
        let mut state = self.state();

        if state.failing_kinds.contains(command.kind()) {
            return Err(SendError::rejected(400, format!("{} rejected", command.kind())));
        }

        tracing::info!(
            kind = command.kind(),
            recipient = %command.recipient(),
            at_ms = at.as_millis() as u64,
            "Dry run: send suppressed"
        );

        state.sent.push(RecordedSend {
            at,
            command: command.clone(),
        });

        Ok(SendReceipt {
            recipient_id: Some(command.recipient().as_str().to_string()),
            message_id: Some(format!("dry-run.{}", state.sent.len())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SenderId;

    #[tokio::test]
    async fn records_commands_in_order() {
        let recorder = RecordingSendAdapter::new();
        let sender = SenderId::new("u");

        recorder.send(&SendCommand::typing_on(&sender)).await.unwrap();
        recorder.send(&SendCommand::text(&sender, "hello")).await.unwrap();

        assert_eq!(recorder.kinds(), vec!["sender_action", "text"]);
        assert_eq!(recorder.messages().len(), 1);
    }

    #[tokio::test]
    async fn fail_on_rejects_kind_without_recording() {
        let recorder = RecordingSendAdapter::new();
        recorder.fail_on("text");

        let result = recorder
            .send(&SendCommand::text(&SenderId::new("u"), "hello"))
            .await;

        assert!(matches!(result, Err(SendError::Rejected { status: 400, .. })));
        assert!(recorder.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timestamps_follow_the_tokio_clock() {
        let recorder = RecordingSendAdapter::new();
        let sender = SenderId::new("u");

        tokio::time::sleep(Duration::from_millis(1100)).await;
        recorder.send(&SendCommand::text(&sender, "late")).await.unwrap();

        assert_eq!(recorder.sent()[0].at, Duration::from_millis(1100));
    }
}
