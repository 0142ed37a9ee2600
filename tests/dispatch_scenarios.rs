//! End-to-end dispatch scenarios on a paused clock.
//!
//! A webhook payload goes in, the scripted agent answers with reply items,
//! and the recorder captures what reaches the Send API and when.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use messenger_relay::adapters::{
    InMemorySessionRegistry, LoggingEmailNotifier, MockNluClient, RecordingSendAdapter,
};
use messenger_relay::application::{
    ActionFlowSettings, ActionFlows, DispatchScheduler, ProcessTurnHandler, ReceiveWebhookHandler,
};
use messenger_relay::domain::conversation::{Button, Card, TurnItem, TurnResult};
use messenger_relay::domain::dispatch::{
    Pacing, PacingStrategy, ResponseSequencer, SendCommand, TemplateButton,
};
use messenger_relay::domain::messenger::WebhookPayload;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn build_relay(pacing: Pacing, nlu: MockNluClient) -> (ReceiveWebhookHandler, RecordingSendAdapter) {
    let recorder = RecordingSendAdapter::new();
    let sessions = Arc::new(InMemorySessionRegistry::new());
    let sequencer = ResponseSequencer::new(pacing);
    let flows = ActionFlows::new(
        sequencer,
        Arc::new(LoggingEmailNotifier::new()),
        ActionFlowSettings::default(),
    );
    let turns = ProcessTurnHandler::new(
        Arc::new(nlu),
        sessions.clone(),
        DispatchScheduler::new(Arc::new(recorder.clone())),
        sequencer,
        Arc::new(flows),
    );

    (ReceiveWebhookHandler::new(Arc::new(turns), sessions), recorder)
}

fn text_from_user(text: &str) -> WebhookPayload {
    serde_json::from_value(json!({
        "object": "page",
        "entry": [{
            "id": "PAGE",
            "time": 1,
            "messaging": [{
                "sender": { "id": "USER" },
                "recipient": { "id": "PAGE" },
                "timestamp": 1,
                "message": { "mid": "m1", "text": text }
            }]
        }]
    }))
    .unwrap()
}

fn card(title: &str) -> TurnItem {
    TurnItem::Card(
        Card::new(title)
            .with_image(format!("https://img.example/{title}.png"))
            .with_subtitle("From 9.90")
            .with_button(Button::classify("Open", "https://shop.example/item"))
            .with_button(Button::classify("Buy", "BUY_PAYLOAD")),
    )
}

fn agent_reply(items: Vec<TurnItem>) -> MockNluClient {
    MockNluClient::new().with_result(TurnResult::with_items(items))
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

/// (kind, offset) of every non-typing send.
fn timeline(recorder: &RecordingSendAdapter) -> Vec<(&'static str, Duration)> {
    let mut sends: Vec<_> = recorder
        .messages()
        .into_iter()
        .map(|sent| (sent.command.kind(), sent.at))
        .collect();
    sends.sort_by_key(|(_, at)| *at);
    sends
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test(start_paused = true)]
async fn sequential_pacing_spaces_every_unit() {
    let (relay, recorder) = build_relay(
        Pacing::new(PacingStrategy::Sequential, ms(1100)),
        agent_reply(vec![
            TurnItem::text(["Here is what we have"]),
            card("A"),
            card("B"),
            TurnItem::image("https://img.example/banner.png"),
        ]),
    );

    relay.handle(text_from_user("show me products")).wait().await;

    assert_eq!(
        timeline(&recorder),
        vec![
            ("text", ms(0)),
            ("generic_template", ms(1100)),
            ("image", ms(2200)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn trailing_card_run_becomes_one_gallery() {
    let (relay, recorder) = build_relay(
        Pacing::default(),
        agent_reply(vec![TurnItem::text(["Our picks"]), card("A"), card("B"), card("C")]),
    );

    relay.handle(text_from_user("picks")).wait().await;

    assert_eq!(
        timeline(&recorder),
        vec![("text", ms(0)), ("generic_template", ms(2200))]
    );

    let gallery = recorder
        .commands()
        .into_iter()
        .find(|command| command.kind() == "generic_template")
        .unwrap();
    match gallery {
        SendCommand::GenericTemplate { elements, .. } => {
            let titles: Vec<_> = elements.iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles, vec!["A", "B", "C"]);
            assert!(matches!(elements[0].buttons[0], TemplateButton::WebUrl { .. }));
            assert!(matches!(elements[0].buttons[1], TemplateButton::Postback { .. }));
        }
        other => panic!("expected a gallery, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn unsupported_items_leave_a_gap_in_source_index_pacing() {
    let (relay, recorder) = build_relay(
        Pacing::default(),
        agent_reply(vec![
            TurnItem::text(["First"]),
            TurnItem::Unsupported {
                kind: "payload".to_string(),
            },
            TurnItem::image("https://img.example/x.png"),
        ]),
    );

    relay.handle(text_from_user("hi")).wait().await;

    assert_eq!(timeline(&recorder), vec![("text", ms(0)), ("image", ms(2200))]);
}

#[tokio::test(start_paused = true)]
async fn multi_line_text_sends_each_non_empty_line_together() {
    let (relay, recorder) = build_relay(
        Pacing::default(),
        agent_reply(vec![
            TurnItem::text(["Hello", "", "How can I help?"]),
            TurnItem::quick_replies("Pick one", ["Orders", "Shipping"]),
        ]),
    );

    relay.handle(text_from_user("hi")).wait().await;

    assert_eq!(
        timeline(&recorder),
        vec![
            ("text", ms(0)),
            ("text", ms(0)),
            ("quick_replies", ms(1100)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn failed_send_does_not_stop_later_units() {
    let (relay, recorder) = build_relay(
        Pacing::default(),
        agent_reply(vec![
            TurnItem::image("https://img.example/broken.png"),
            TurnItem::text(["Still here"]),
        ]),
    );
    recorder.fail_on("image");

    relay.handle(text_from_user("hi")).wait().await;

    assert_eq!(timeline(&recorder), vec![("text", ms(1100))]);
}
