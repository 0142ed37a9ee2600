//! Messenger module - inbound webhook payloads and their authentication.

mod inbound;
mod webhook_errors;
mod webhook_verifier;

pub use inbound::{
    AccountLinking, Attachment, Delivery, InboundMessage, MessageContent, MessagingEvent,
    MessagingEventKind, Optin, PageEntry, Participant, Postback, QuickReplyPayload, ReadReceipt,
    WebhookPayload,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{MessengerSignatureVerifier, SignatureHeader, SIGNATURE_HEADER};

#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
