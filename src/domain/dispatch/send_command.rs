//! Outbound send commands, one per platform Send API call.

use crate::domain::foundation::SenderId;

/// A materialized outbound message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendCommand {
    Text {
        recipient: SenderId,
        text: String,
    },
    QuickReplies {
        recipient: SenderId,
        text: String,
        replies: Vec<QuickReplyOption>,
    },
    Image {
        recipient: SenderId,
        url: String,
    },
    ButtonTemplate {
        recipient: SenderId,
        text: String,
        buttons: Vec<TemplateButton>,
    },
    GenericTemplate {
        recipient: SenderId,
        elements: Vec<GalleryElement>,
    },
    SenderAction {
        recipient: SenderId,
        action: SenderAction,
    },
}

impl SendCommand {
    pub fn text(recipient: &SenderId, text: impl Into<String>) -> Self {
        SendCommand::Text {
            recipient: recipient.clone(),
            text: text.into(),
        }
    }

    pub fn typing_on(recipient: &SenderId) -> Self {
        SendCommand::SenderAction {
            recipient: recipient.clone(),
            action: SenderAction::TypingOn,
        }
    }

    pub fn typing_off(recipient: &SenderId) -> Self {
        SendCommand::SenderAction {
            recipient: recipient.clone(),
            action: SenderAction::TypingOff,
        }
    }

    pub fn recipient(&self) -> &SenderId {
        match self {
            SendCommand::Text { recipient, .. }
            | SendCommand::QuickReplies { recipient, .. }
            | SendCommand::Image { recipient, .. }
            | SendCommand::ButtonTemplate { recipient, .. }
            | SendCommand::GenericTemplate { recipient, .. }
            | SendCommand::SenderAction { recipient, .. } => recipient,
        }
    }

    /// Stable kind name for logs and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            SendCommand::Text { .. } => "text",
            SendCommand::QuickReplies { .. } => "quick_replies",
            SendCommand::Image { .. } => "image",
            SendCommand::ButtonTemplate { .. } => "button_template",
            SendCommand::GenericTemplate { .. } => "generic_template",
            SendCommand::SenderAction { .. } => "sender_action",
        }
    }
}

/// A quick reply option. Title and payload are both the option text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReplyOption {
    pub title: String,
    pub payload: String,
}

impl QuickReplyOption {
    pub fn verbatim(option: impl Into<String>) -> Self {
        let option = option.into();
        Self {
            title: option.clone(),
            payload: option,
        }
    }
}

/// A template button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateButton {
    WebUrl { title: String, url: String },
    Postback { title: String, payload: String },
    PhoneNumber { title: String, payload: String },
}

/// One element of a generic (gallery) template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryElement {
    pub title: String,
    pub image_url: String,
    pub subtitle: String,
    pub buttons: Vec<TemplateButton>,
}

/// Typing indicators and read receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderAction {
    TypingOn,
    TypingOff,
    MarkSeen,
}

impl SenderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderAction::TypingOn => "typing_on",
            SenderAction::TypingOff => "typing_off",
            SenderAction::MarkSeen => "mark_seen",
        }
    }
}
