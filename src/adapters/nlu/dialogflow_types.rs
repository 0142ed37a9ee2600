//! Dialogflow v2 REST request/response types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::conversation::{Button, Card, OutputContext, TurnItem, TurnResult};
use crate::ports::QueryInput;

// ════════════════════════════════════════════════════════════════════════════════
// Request
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentBody {
    pub query_input: QueryInputDto,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInputDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextInputDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventInputDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInputDto {
    pub text: String,
    pub language_code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInputDto {
    pub name: String,
    pub language_code: String,
}

impl DetectIntentBody {
    pub fn new(query: &QueryInput, language_code: &str) -> Self {
        let query_input = match query {
            QueryInput::Text(text) => QueryInputDto {
                text: Some(TextInputDto {
                    text: text.clone(),
                    language_code: language_code.to_string(),
                }),
                event: None,
            },
            QueryInput::Event(name) => QueryInputDto {
                text: None,
                event: Some(EventInputDto {
                    name: name.clone(),
                    language_code: language_code.to_string(),
                }),
            },
        };

        Self { query_input }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentResponseDto {
    #[serde(default)]
    pub response_id: Option<String>,
    #[serde(default)]
    pub query_result: Option<QueryResultDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResultDto {
    #[serde(default)]
    pub query_text: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub fulfillment_text: String,
    #[serde(default)]
    pub fulfillment_messages: Vec<FulfillmentMessageDto>,
    #[serde(default)]
    pub output_contexts: Vec<OutputContextDto>,
}

/// One rich message. Exactly one of the known fields is expected to be set;
/// anything else lands in `other`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentMessageDto {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub text: Option<TextMessageDto>,
    #[serde(default)]
    pub quick_replies: Option<QuickRepliesDto>,
    #[serde(default)]
    pub image: Option<ImageDto>,
    #[serde(default)]
    pub card: Option<CardDto>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextMessageDto {
    #[serde(default)]
    pub text: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRepliesDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub quick_replies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDto {
    #[serde(default)]
    pub image_uri: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub image_uri: String,
    #[serde(default)]
    pub buttons: Vec<CardButtonDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardButtonDto {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub postback: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputContextDto {
    pub name: String,
    #[serde(default)]
    pub lifespan_count: u32,
    #[serde(default)]
    pub parameters: Option<Map<String, Value>>,
}

/// Error envelope of Google APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleErrorResponse {
    pub error: GoogleError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Conversions
// ════════════════════════════════════════════════════════════════════════════════

impl From<FulfillmentMessageDto> for TurnItem {
    fn from(message: FulfillmentMessageDto) -> Self {
        if let Some(text) = message.text {
            return TurnItem::Text { lines: text.text };
        }
        if let Some(quick_replies) = message.quick_replies {
            return TurnItem::QuickReplies {
                title: quick_replies.title,
                options: quick_replies.quick_replies,
            };
        }
        if let Some(image) = message.image {
            return TurnItem::Image {
                uri: image.image_uri,
            };
        }
        if let Some(card) = message.card {
            return TurnItem::Card(Card::from(card));
        }

        let kind = message
            .other
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| "empty".to_string());
        TurnItem::Unsupported { kind }
    }
}

impl From<CardDto> for Card {
    fn from(card: CardDto) -> Self {
        Card {
            title: card.title,
            image_uri: card.image_uri,
            subtitle: card.subtitle,
            buttons: card
                .buttons
                .into_iter()
                .map(|b| Button::classify(b.text, b.postback))
                .collect(),
        }
    }
}

impl From<OutputContextDto> for OutputContext {
    fn from(context: OutputContextDto) -> Self {
        OutputContext {
            name: context.name,
            lifespan_count: context.lifespan_count,
            parameters: context.parameters,
        }
    }
}

impl From<QueryResultDto> for TurnResult {
    fn from(result: QueryResultDto) -> Self {
        TurnResult {
            fulfillment_text: result.fulfillment_text,
            items: result
                .fulfillment_messages
                .into_iter()
                .map(TurnItem::from)
                .collect(),
            action: result.action,
            output_contexts: result
                .output_contexts
                .into_iter()
                .map(OutputContext::from)
                .collect(),
            parameters: result.parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ButtonAction;
    use serde_json::json;

    #[test]
    fn text_query_serializes_camel_case() {
        let body = DetectIntentBody::new(&QueryInput::text("hello"), "it");
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "queryInput": { "text": { "text": "hello", "languageCode": "it" } } })
        );
    }

    #[test]
    fn event_query_serializes_event_only() {
        let body = DetectIntentBody::new(&QueryInput::event("eventoCustom"), "en-US");
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "queryInput": { "event": { "name": "eventoCustom", "languageCode": "en-US" } } })
        );
    }

    #[test]
    fn query_result_converts_to_turn_result() {
        let raw = json!({
            "responseId": "r-1",
            "queryResult": {
                "queryText": "show me",
                "action": "faq-spedizione",
                "parameters": { "city": "Rome" },
                "fulfillmentText": "Here you go",
                "fulfillmentMessages": [
                    { "text": { "text": ["Here you go"] } },
                    { "card": {
                        "title": "A",
                        "subtitle": "sub",
                        "imageUri": "https://img/a.png",
                        "buttons": [
                            { "text": "Open", "postback": "https://a.example" },
                            { "text": "Pick", "postback": "PICK_A" }
                        ]
                    } },
                    { "quickReplies": { "title": "More?", "quickReplies": ["Yes", "No"] } },
                    { "image": { "imageUri": "https://img/b.png" } },
                    { "payload": { "facebook": {} } }
                ],
                "outputContexts": [
                    { "name": "projects/p/agent/sessions/s/contexts/spedizione", "lifespanCount": 2,
                      "parameters": { "tracking": "X1" } }
                ]
            }
        });

        let response: DetectIntentResponseDto = serde_json::from_value(raw).unwrap();
        let result = TurnResult::from(response.query_result.unwrap());

        assert_eq!(result.action(), Some("faq-spedizione"));
        assert_eq!(result.fulfillment_text, "Here you go");
        assert_eq!(result.items.len(), 5);
        assert_eq!(result.items[0], TurnItem::text(["Here you go"]));

        let TurnItem::Card(card) = &result.items[1] else {
            panic!("expected card, got {:?}", result.items[1]);
        };
        assert_eq!(card.image_uri, "https://img/a.png");
        assert!(card.buttons[0].is_link());
        assert_eq!(
            card.buttons[1].action,
            ButtonAction::Postback {
                payload: "PICK_A".to_string()
            }
        );

        assert_eq!(result.items[2], TurnItem::quick_replies("More?", ["Yes", "No"]));
        assert_eq!(result.items[3], TurnItem::image("https://img/b.png"));
        assert_eq!(
            result.items[4],
            TurnItem::Unsupported {
                kind: "payload".to_string()
            }
        );

        let context = result.primary_context().unwrap();
        assert!(context.name_contains("spedizione"));
        assert_eq!(context.text_param("tracking").as_deref(), Some("X1"));
    }

    #[test]
    fn sparse_query_result_uses_defaults() {
        let result: QueryResultDto = serde_json::from_value(json!({})).unwrap();
        let turn = TurnResult::from(result);

        assert!(turn.items.is_empty());
        assert_eq!(turn.action(), None);
        assert!(turn.fulfillment_text.is_empty());
    }

    #[test]
    fn platform_tag_does_not_change_kind() {
        let message: FulfillmentMessageDto = serde_json::from_value(json!({
            "platform": "FACEBOOK",
            "image": { "imageUri": "https://img/c.png" }
        }))
        .unwrap();

        assert_eq!(TurnItem::from(message), TurnItem::image("https://img/c.png"));
    }
}
