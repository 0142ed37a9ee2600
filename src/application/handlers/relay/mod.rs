//! Relay handlers: inbound webhook events, NLU turns and action flows.

mod action_flows;
mod process_turn;
mod receive_webhook;

pub use action_flows::{
    ActionFlowSettings, ActionFlows, ActionOutcome, JobApplication, BOOKING_DATA_COLLECTION,
    CHAT_PAYLOAD, DETAILED_APPLICATION, DRUG_CHECK, DRUG_CHECK_FOLLOW_UP_EVENT, FAQ_SHIPPING,
};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnHandler, ProcessTurnResult, TurnOutcome, NO_MATCH_TEXT,
};
pub use receive_webhook::{
    EventDisposition, ReceiveWebhookHandler, ReceiveWebhookResult, ATTACHMENT_REPLY,
    AUTHENTICATION_REPLY, CHAT_REPLY, JOB_APPLY_PAYLOAD, JOB_APPLY_QUERY,
};
