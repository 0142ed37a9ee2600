//! ReceiveWebhookHandler - routes verified webhook events.
//!
//! Each messaging event is handled in its own task so the HTTP response is
//! never held up by NLU calls or paced sends.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::application::scheduler::DispatchScheduler;
use crate::domain::dispatch::SendCommand;
use crate::domain::foundation::SenderId;
use crate::domain::messenger::{MessageContent, MessagingEvent, MessagingEventKind, WebhookPayload};
use crate::ports::SessionRegistry;

use super::action_flows::CHAT_PAYLOAD;
use super::process_turn::{ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult, NO_MATCH_TEXT};

pub const AUTHENTICATION_REPLY: &str = "Authentication successful";
pub const ATTACHMENT_REPLY: &str = "Attachment received. Thank you.";
pub const CHAT_REPLY: &str = "I like chatting too... any other questions?";

/// Postback payload that starts the job application dialog.
pub const JOB_APPLY_PAYLOAD: &str = "JOB_APPLY";
pub const JOB_APPLY_QUERY: &str = "I'm looking for a job";

/// What happened to one messaging event.
#[derive(Debug)]
pub enum EventDisposition {
    /// The event was forwarded to the NLU.
    Turn(ProcessTurnResult),
    /// A fixed text reply was sent.
    Replied,
    /// The event was only logged.
    Logged,
}

/// Tasks spawned for one webhook delivery.
#[derive(Debug, Default)]
pub struct ReceiveWebhookResult {
    pub tasks: Vec<JoinHandle<EventDisposition>>,
}

impl ReceiveWebhookResult {
    pub fn event_count(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every event and every send it scheduled.
    pub async fn wait(self) -> Vec<EventDisposition> {
        let mut dispositions = Vec::with_capacity(self.tasks.len());

        for joined in join_all(self.tasks).await {
            match joined {
                Ok(EventDisposition::Turn(result)) => {
                    let outcome = result.outcome.clone();
                    result.dispatch.wait().await;
                    dispositions.push(EventDisposition::Turn(ProcessTurnResult {
                        outcome,
                        dispatch: Default::default(),
                    }));
                }
                Ok(other) => dispositions.push(other),
                Err(error) => tracing::error!(error = %error, "Webhook event task panicked"),
            }
        }

        dispositions
    }
}

/// Handler for verified webhook payloads.
#[derive(Clone)]
pub struct ReceiveWebhookHandler {
    turns: Arc<ProcessTurnHandler>,
    sessions: Arc<dyn SessionRegistry>,
}

impl ReceiveWebhookHandler {
    pub fn new(turns: Arc<ProcessTurnHandler>, sessions: Arc<dyn SessionRegistry>) -> Self {
        Self { turns, sessions }
    }

    /// Spawns one task per messaging event. Non-page objects are ignored.
    pub fn handle(&self, payload: WebhookPayload) -> ReceiveWebhookResult {
        if !payload.is_page_subscription() {
            tracing::debug!(object = %payload.object, "Ignoring non-page webhook object");
            return ReceiveWebhookResult::default();
        }

        let tasks = payload
            .entry
            .into_iter()
            .flat_map(|entry| entry.messaging)
            .map(|event| {
                let handler = self.clone();
                tokio::spawn(async move { handler.route(event).await })
            })
            .collect();

        ReceiveWebhookResult { tasks }
    }

    async fn route(&self, event: MessagingEvent) -> EventDisposition {
        let sender = event.sender_id().clone();

        match event.kind() {
            MessagingEventKind::Optin(optin) => {
                tracing::info!(
                    sender = %sender,
                    recipient = %event.recipient.id,
                    reference = optin.reference.as_deref().unwrap_or("-"),
                    "Received authentication"
                );
                self.reply(&sender, AUTHENTICATION_REPLY).await
            }
            MessagingEventKind::Message(message) => {
                self.sessions.ensure_session(&sender).await;

                match message.content() {
                    MessageContent::Echo => {
                        tracing::debug!(
                            mid = message.mid.as_deref().unwrap_or("-"),
                            app_id = message.app_id,
                            metadata = message.metadata.as_deref().unwrap_or("-"),
                            "Received echo"
                        );
                        EventDisposition::Logged
                    }
                    MessageContent::QuickReply(payload) => {
                        tracing::debug!(
                            sender = %sender,
                            mid = message.mid.as_deref().unwrap_or("-"),
                            payload,
                            "Received quick reply"
                        );
                        self.turn(ProcessTurnCommand::text(sender, payload)).await
                    }
                    MessageContent::Text(text) => {
                        self.turn(ProcessTurnCommand::text(sender, text)).await
                    }
                    MessageContent::Attachments(attachments) => {
                        tracing::debug!(
                            sender = %sender,
                            count = attachments.len(),
                            "Received attachments"
                        );
                        self.reply(&sender, ATTACHMENT_REPLY).await
                    }
                    MessageContent::Empty => EventDisposition::Logged,
                }
            }
            MessagingEventKind::Delivery(delivery) => {
                for mid in &delivery.mids {
                    tracing::debug!(mid = %mid, "Received delivery confirmation");
                }
                tracing::debug!(watermark = delivery.watermark, "All messages before watermark delivered");
                EventDisposition::Logged
            }
            MessagingEventKind::Postback(postback) => {
                self.sessions.ensure_session(&sender).await;
                tracing::info!(
                    sender = %sender,
                    recipient = %event.recipient.id,
                    payload = %postback.payload,
                    timestamp = event.timestamp,
                    "Received postback"
                );

                match postback.payload.as_str() {
                    CHAT_PAYLOAD => self.reply(&sender, CHAT_REPLY).await,
                    JOB_APPLY_PAYLOAD => {
                        self.turn(ProcessTurnCommand::text(sender, JOB_APPLY_QUERY)).await
                    }
                    _ => self.reply(&sender, NO_MATCH_TEXT).await,
                }
            }
            MessagingEventKind::Read(read) => {
                tracing::debug!(
                    watermark = read.watermark,
                    seq = read.seq,
                    "Received message read event"
                );
                EventDisposition::Logged
            }
            MessagingEventKind::AccountLinking(linking) => {
                tracing::info!(
                    sender = %sender,
                    status = %linking.status,
                    authorization_code = linking.authorization_code.as_deref().unwrap_or("-"),
                    "Received account link event"
                );
                EventDisposition::Logged
            }
            MessagingEventKind::Unknown => {
                tracing::warn!(sender = %sender, "Webhook received unknown messaging event");
                EventDisposition::Logged
            }
        }
    }

    async fn turn(&self, cmd: ProcessTurnCommand) -> EventDisposition {
        EventDisposition::Turn(self.turns.handle(cmd).await)
    }

    async fn reply(&self, sender: &SenderId, text: &str) -> EventDisposition {
        self.turns
            .scheduler()
            .send_now(SendCommand::text(sender, text))
            .await;
        EventDisposition::Replied
    }
}
