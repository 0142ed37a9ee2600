//! ProcessTurnHandler - runs one NLU turn for a sender and dispatches the reply.

use std::sync::Arc;

use crate::application::scheduler::{DispatchHandle, DispatchScheduler};
use crate::domain::conversation::TurnResult;
use crate::domain::dispatch::{ResponseSequencer, SendCommand};
use crate::domain::foundation::SenderId;
use crate::ports::{DetectIntentRequest, NluClient, NluError, QueryInput, SessionRegistry};

use super::action_flows::{ActionFlows, ActionOutcome};

/// Sent when the agent matched nothing and returned no text.
pub const NO_MATCH_TEXT: &str = "I'm not sure what you want. Can you be more specific?";

/// Upper bound on chained follow-up events within one inbound message.
const MAX_FOLLOW_UP_EVENTS: usize = 3;

/// Command to run a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTurnCommand {
    pub sender: SenderId,
    pub query: QueryInput,
}

impl ProcessTurnCommand {
    pub fn text(sender: SenderId, text: impl Into<String>) -> Self {
        Self {
            sender,
            query: QueryInput::text(text),
        }
    }

    pub fn event(sender: SenderId, name: impl Into<String>) -> Self {
        Self {
            sender,
            query: QueryInput::event(name),
        }
    }
}

/// How the turn was routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The NLU call failed; nothing was sent besides the typing indicator.
    Abandoned(NluError),
    /// An action flow handled the turn.
    Action(String),
    /// Reply items were scheduled.
    Dispatched { units: usize },
    /// The agent returned nothing usable.
    NoMatch,
    /// The plain fulfillment text was sent.
    FulfillmentText,
}

/// Result of a processed turn.
#[derive(Debug)]
pub struct ProcessTurnResult {
    pub outcome: TurnOutcome,
    /// Sends still pending on timers.
    pub dispatch: DispatchHandle,
}

/// Handler for NLU turns.
pub struct ProcessTurnHandler {
    nlu: Arc<dyn NluClient>,
    sessions: Arc<dyn SessionRegistry>,
    scheduler: DispatchScheduler,
    sequencer: ResponseSequencer,
    flows: Arc<ActionFlows>,
}

impl ProcessTurnHandler {
    pub fn new(
        nlu: Arc<dyn NluClient>,
        sessions: Arc<dyn SessionRegistry>,
        scheduler: DispatchScheduler,
        sequencer: ResponseSequencer,
        flows: Arc<ActionFlows>,
    ) -> Self {
        Self {
            nlu,
            sessions,
            scheduler,
            sequencer,
            flows,
        }
    }

    pub fn scheduler(&self) -> &DispatchScheduler {
        &self.scheduler
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> ProcessTurnResult {
        let ProcessTurnCommand { sender, mut query } = cmd;
        let mut dispatch = DispatchHandle::empty();

        for _ in 0..=MAX_FOLLOW_UP_EVENTS {
            let turn = match self.detect(&sender, query).await {
                Ok(turn) => turn,
                Err(error) => {
                    return ProcessTurnResult {
                        outcome: TurnOutcome::Abandoned(error),
                        dispatch,
                    }
                }
            };

            self.scheduler
                .send_now(SendCommand::typing_off(&sender))
                .await;

            let Some(action) = turn.action() else {
                let outcome = self.route_reply(&turn, &sender, &mut dispatch).await;
                return ProcessTurnResult { outcome, dispatch };
            };

            match self.flows.run(action, &turn, &sender).await {
                ActionOutcome::Dispatch(schedule) => {
                    dispatch.merge(self.scheduler.dispatch(schedule).await);
                }
                ActionOutcome::Completed => {}
                ActionOutcome::FollowUpEvent(event) => {
                    tracing::debug!(sender = %sender, event = %event, "Running follow-up event");
                    query = QueryInput::Event(event);
                    continue;
                }
            }

            return ProcessTurnResult {
                outcome: TurnOutcome::Action(action.to_string()),
                dispatch,
            };
        }

        tracing::warn!(sender = %sender, "Follow-up event limit reached, stopping");
        ProcessTurnResult {
            outcome: TurnOutcome::Action("follow-up-limit".to_string()),
            dispatch,
        }
    }

    /// Typing-on, session lookup and the NLU call.
    async fn detect(&self, sender: &SenderId, query: QueryInput) -> Result<TurnResult, NluError> {
        self.scheduler.send_now(SendCommand::typing_on(sender)).await;

        let session_id = self.sessions.ensure_session(sender).await;
        let result = self
            .nlu
            .detect_intent(DetectIntentRequest::new(session_id, query))
            .await;

        if let Err(error) = &result {
            tracing::warn!(
                sender = %sender,
                session = %session_id,
                error = %error,
                "NLU request failed, abandoning turn"
            );
        }
        result
    }

    async fn route_reply(
        &self,
        turn: &TurnResult,
        sender: &SenderId,
        dispatch: &mut DispatchHandle,
    ) -> TurnOutcome {
        if turn.has_items() {
            let schedule = self.sequencer.schedule(&turn.items, sender);
            let units = schedule.len();
            dispatch.merge(self.scheduler.dispatch(schedule).await);
            return TurnOutcome::Dispatched { units };
        }

        if turn.fulfillment_text.is_empty() {
            self.scheduler
                .send_now(SendCommand::text(sender, NO_MATCH_TEXT))
                .await;
            return TurnOutcome::NoMatch;
        }

        self.scheduler
            .send_now(SendCommand::text(sender, turn.fulfillment_text.clone()))
            .await;
        TurnOutcome::FulfillmentText
    }
}
