//! Send API request/response bodies.
//!
//! Maps [`SendCommand`]s onto the platform's JSON payload shapes.

use serde::{Deserialize, Serialize};

use crate::domain::dispatch::{GalleryElement, QuickReplyOption, SendCommand, TemplateButton};

/// Body of `POST /me/messages`.
#[derive(Debug, Clone, Serialize)]
pub struct SendApiRequest {
    pub recipient: Recipient,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<OutgoingMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_action: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recipient {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutgoingMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_replies: Option<Vec<QuickReplyDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuickReplyDto {
    pub content_type: &'static str,
    pub title: String,
    pub payload: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentDto {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub payload: AttachmentPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AttachmentPayload {
    Media { url: String },
    Template(TemplatePayload),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "template_type", rename_all = "snake_case")]
pub enum TemplatePayload {
    Button {
        text: String,
        buttons: Vec<ButtonDto>,
    },
    Generic {
        elements: Vec<ElementDto>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ButtonDto {
    WebUrl { title: String, url: String },
    Postback { title: String, payload: String },
    PhoneNumber { title: String, payload: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementDto {
    pub title: String,
    pub image_url: String,
    pub subtitle: String,
    pub buttons: Vec<ButtonDto>,
}

/// Successful Send API response.
#[derive(Debug, Clone, Deserialize)]
pub struct SendApiResponse {
    pub recipient_id: Option<String>,
    pub message_id: Option<String>,
}

/// Error envelope returned by the Graph API.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub code: Option<i64>,
}

impl From<&SendCommand> for SendApiRequest {
    fn from(command: &SendCommand) -> Self {
        let recipient = Recipient {
            id: command.recipient().as_str().to_string(),
        };

        let message = |message: OutgoingMessage| Self {
            recipient: recipient.clone(),
            message: Some(message),
            sender_action: None,
        };

        match command {
            SendCommand::Text { text, .. } => message(OutgoingMessage {
                text: Some(text.clone()),
                ..Default::default()
            }),
            SendCommand::QuickReplies { text, replies, .. } => message(OutgoingMessage {
                text: Some(text.clone()),
                quick_replies: Some(replies.iter().map(QuickReplyDto::from).collect()),
                ..Default::default()
            }),
            SendCommand::Image { url, .. } => message(OutgoingMessage {
                attachment: Some(AttachmentDto {
                    kind: "image",
                    payload: AttachmentPayload::Media { url: url.clone() },
                }),
                ..Default::default()
            }),
            SendCommand::ButtonTemplate { text, buttons, .. } => message(OutgoingMessage {
                attachment: Some(AttachmentDto::template(TemplatePayload::Button {
                    text: text.clone(),
                    buttons: buttons.iter().map(ButtonDto::from).collect(),
                })),
                ..Default::default()
            }),
            SendCommand::GenericTemplate { elements, .. } => message(OutgoingMessage {
                attachment: Some(AttachmentDto::template(TemplatePayload::Generic {
                    elements: elements.iter().map(ElementDto::from).collect(),
                })),
                ..Default::default()
            }),
            SendCommand::SenderAction { action, .. } => Self {
                recipient: recipient.clone(),
                message: None,
                sender_action: Some(action.as_str()),
            },
        }
    }
}

impl AttachmentDto {
    fn template(payload: TemplatePayload) -> Self {
        Self {
            kind: "template",
            payload: AttachmentPayload::Template(payload),
        }
    }
}

impl From<&QuickReplyOption> for QuickReplyDto {
    fn from(option: &QuickReplyOption) -> Self {
        Self {
            content_type: "text",
            title: option.title.clone(),
            payload: option.payload.clone(),
        }
    }
}

impl From<&TemplateButton> for ButtonDto {
    fn from(button: &TemplateButton) -> Self {
        match button {
            TemplateButton::WebUrl { title, url } => ButtonDto::WebUrl {
                title: title.clone(),
                url: url.clone(),
            },
            TemplateButton::Postback { title, payload } => ButtonDto::Postback {
                title: title.clone(),
                payload: payload.clone(),
            },
            TemplateButton::PhoneNumber { title, payload } => ButtonDto::PhoneNumber {
                title: title.clone(),
                payload: payload.clone(),
            },
        }
    }
}

impl From<&GalleryElement> for ElementDto {
    fn from(element: &GalleryElement) -> Self {
        Self {
            title: element.title.clone(),
            image_url: element.image_url.clone(),
            subtitle: element.subtitle.clone(),
            buttons: element.buttons.iter().map(ButtonDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dispatch::SenderAction;
    use crate::domain::foundation::SenderId;
    use serde_json::json;

    fn to_json(command: &SendCommand) -> serde_json::Value {
        serde_json::to_value(SendApiRequest::from(command)).unwrap()
    }

    fn sender() -> SenderId {
        SenderId::new("USER_1")
    }

    #[test]
    fn text_payload_shape() {
        assert_eq!(
            to_json(&SendCommand::text(&sender(), "hello")),
            json!({ "recipient": { "id": "USER_1" }, "message": { "text": "hello" } })
        );
    }

    #[test]
    fn quick_replies_payload_shape() {
        let command = SendCommand::QuickReplies {
            recipient: sender(),
            text: "Pick".to_string(),
            replies: vec![QuickReplyOption::verbatim("Yes"), QuickReplyOption::verbatim("No")],
        };

        assert_eq!(
            to_json(&command),
            json!({
                "recipient": { "id": "USER_1" },
                "message": {
                    "text": "Pick",
                    "quick_replies": [
                        { "content_type": "text", "title": "Yes", "payload": "Yes" },
                        { "content_type": "text", "title": "No", "payload": "No" }
                    ]
                }
            })
        );
    }

    #[test]
    fn image_payload_shape() {
        let command = SendCommand::Image {
            recipient: sender(),
            url: "https://img/1.png".to_string(),
        };

        assert_eq!(
            to_json(&command),
            json!({
                "recipient": { "id": "USER_1" },
                "message": {
                    "attachment": { "type": "image", "payload": { "url": "https://img/1.png" } }
                }
            })
        );
    }

    #[test]
    fn button_template_payload_shape() {
        let command = SendCommand::ButtonTemplate {
            recipient: sender(),
            text: "What now?".to_string(),
            buttons: vec![
                TemplateButton::WebUrl {
                    title: "Track".to_string(),
                    url: "https://track".to_string(),
                },
                TemplateButton::PhoneNumber {
                    title: "Call".to_string(),
                    payload: "+390000".to_string(),
                },
                TemplateButton::Postback {
                    title: "Chat".to_string(),
                    payload: "CHAT".to_string(),
                },
            ],
        };

        assert_eq!(
            to_json(&command),
            json!({
                "recipient": { "id": "USER_1" },
                "message": {
                    "attachment": {
                        "type": "template",
                        "payload": {
                            "template_type": "button",
                            "text": "What now?",
                            "buttons": [
                                { "type": "web_url", "title": "Track", "url": "https://track" },
                                { "type": "phone_number", "title": "Call", "payload": "+390000" },
                                { "type": "postback", "title": "Chat", "payload": "CHAT" }
                            ]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn generic_template_payload_shape() {
        let command = SendCommand::GenericTemplate {
            recipient: sender(),
            elements: vec![GalleryElement {
                title: "A".to_string(),
                image_url: "https://img/a.png".to_string(),
                subtitle: "sub".to_string(),
                buttons: vec![TemplateButton::Postback {
                    title: "Pick".to_string(),
                    payload: "PICK_A".to_string(),
                }],
            }],
        };

        assert_eq!(
            to_json(&command),
            json!({
                "recipient": { "id": "USER_1" },
                "message": {
                    "attachment": {
                        "type": "template",
                        "payload": {
                            "template_type": "generic",
                            "elements": [{
                                "title": "A",
                                "image_url": "https://img/a.png",
                                "subtitle": "sub",
                                "buttons": [ { "type": "postback", "title": "Pick", "payload": "PICK_A" } ]
                            }]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn sender_action_has_no_message() {
        let command = SendCommand::SenderAction {
            recipient: sender(),
            action: SenderAction::TypingOn,
        };

        assert_eq!(
            to_json(&command),
            json!({ "recipient": { "id": "USER_1" }, "sender_action": "typing_on" })
        );
    }

    #[test]
    fn graph_error_envelope_parses() {
        let body = r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#;
        let parsed: GraphErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.code, Some(190));
        assert_eq!(parsed.error.kind.as_deref(), Some("OAuthException"));
    }
}
