//! Inbound Messenger Platform webhook payloads.
//!
//! Only the fields the relay acts on are modelled; everything else in the
//! platform payload is ignored by serde.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::foundation::SenderId;

/// Object type of page subscriptions.
const PAGE_OBJECT: &str = "page";

/// Top-level webhook body. Events may be batched across several entries.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    pub object: String,
    #[serde(default)]
    pub entry: Vec<PageEntry>,
}

impl WebhookPayload {
    pub fn is_page_subscription(&self) -> bool {
        self.object == PAGE_OBJECT
    }

    /// Every messaging event of every entry, in delivery order.
    pub fn events(&self) -> impl Iterator<Item = &MessagingEvent> {
        self.entry.iter().flat_map(|entry| entry.messaging.iter())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageEntry {
    pub id: String,
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Participant {
    pub id: SenderId,
}

/// One messaging event. Exactly one of the optional bodies is expected.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    pub recipient: Participant,
    #[serde(default)]
    pub timestamp: i64,
    pub message: Option<InboundMessage>,
    pub postback: Option<Postback>,
    pub delivery: Option<Delivery>,
    pub read: Option<ReadReceipt>,
    pub optin: Option<Optin>,
    pub account_linking: Option<AccountLinking>,
}

/// Borrowed view of what a messaging event carries.
#[derive(Debug, Clone, Copy)]
pub enum MessagingEventKind<'a> {
    Optin(&'a Optin),
    Message(&'a InboundMessage),
    Delivery(&'a Delivery),
    Postback(&'a Postback),
    Read(&'a ReadReceipt),
    AccountLinking(&'a AccountLinking),
    Unknown,
}

impl MessagingEvent {
    pub fn sender_id(&self) -> &SenderId {
        &self.sender.id
    }

    /// Classifies the event. Checked in the platform's documented priority.
    pub fn kind(&self) -> MessagingEventKind<'_> {
        if let Some(optin) = &self.optin {
            MessagingEventKind::Optin(optin)
        } else if let Some(message) = &self.message {
            MessagingEventKind::Message(message)
        } else if let Some(delivery) = &self.delivery {
            MessagingEventKind::Delivery(delivery)
        } else if let Some(postback) = &self.postback {
            MessagingEventKind::Postback(postback)
        } else if let Some(read) = &self.read {
            MessagingEventKind::Read(read)
        } else if let Some(linking) = &self.account_linking {
            MessagingEventKind::AccountLinking(linking)
        } else {
            MessagingEventKind::Unknown
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub mid: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub is_echo: bool,
    pub app_id: Option<u64>,
    pub metadata: Option<String>,
    pub quick_reply: Option<QuickReplyPayload>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// What an inbound message asks the relay to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MessageContent<'a> {
    /// Copy of a message the page itself sent.
    Echo,
    /// Tap on a quick reply; carries its payload.
    QuickReply(&'a str),
    Text(&'a str),
    Attachments(&'a [Attachment]),
    Empty,
}

impl InboundMessage {
    pub fn content(&self) -> MessageContent<'_> {
        if self.is_echo {
            return MessageContent::Echo;
        }
        if let Some(quick_reply) = &self.quick_reply {
            return MessageContent::QuickReply(&quick_reply.payload);
        }
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => MessageContent::Text(text),
            _ if !self.attachments.is_empty() => MessageContent::Attachments(&self.attachments),
            _ => MessageContent::Empty,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuickReplyPayload {
    pub payload: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postback {
    #[serde(default)]
    pub payload: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub mids: Vec<String>,
    #[serde(default)]
    pub watermark: i64,
    pub seq: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadReceipt {
    #[serde(default)]
    pub watermark: i64,
    pub seq: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Optin {
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountLinking {
    pub status: String,
    pub authorization_code: Option<String>,
}
