//! ActionFlows - multi-turn flows keyed by the NLU action name.
//!
//! Each flow inspects the primary output context of the turn and decides
//! what gets sent. Flows never call the NLU themselves; a flow that needs
//! another turn returns [`ActionOutcome::FollowUpEvent`] and the turn
//! handler runs it.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::conversation::{OutputContext, TurnResult};
use crate::domain::dispatch::{
    DispatchSchedule, ResponseSequencer, ScheduledSend, SendCommand, TemplateButton,
};
use crate::domain::foundation::SenderId;
use crate::ports::{EmailNotification, EmailNotifier};

pub const DETAILED_APPLICATION: &str = "detailed-application";
pub const FAQ_SHIPPING: &str = "faq-spedizione";
pub const DRUG_CHECK: &str = "verificaFarmaco";
pub const BOOKING_DATA_COLLECTION: &str = "actionRaccoltaDatiPrenotazione";

/// Event fired when the drug check ends without a prescription.
pub const DRUG_CHECK_FOLLOW_UP_EVENT: &str = "eventoCustom";

/// Payload of the "Chat with us" postback button.
pub const CHAT_PAYLOAD: &str = "CHAT";

const APPLICATION_CONTEXTS: [&str; 3] = [
    "job-application",
    "job-application-details_dialog_context",
    "id_dialog_context",
];

const APPLICATION_SUBJECT: &str = "New job application";

/// Tunables of the action flows.
#[derive(Debug, Clone)]
pub struct ActionFlowSettings {
    /// Where job application summaries go. Falls back to the applicant.
    pub notify_to: Option<String>,
    pub shipping_tracking_url: Option<String>,
    pub support_phone_number: Option<String>,
    /// Pause before the shipping follow-up buttons.
    pub follow_up_delay: Duration,
}

impl Default for ActionFlowSettings {
    fn default() -> Self {
        Self {
            notify_to: None,
            shipping_tracking_url: None,
            support_phone_number: None,
            follow_up_delay: Duration::from_millis(3000),
        }
    }
}

/// What the turn handler should do after a flow ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Execute this schedule for the sender.
    Dispatch(DispatchSchedule),
    /// Run another NLU turn with this event.
    FollowUpEvent(String),
    /// Nothing to send.
    Completed,
}

/// A completed job application read from the context parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub user_name: String,
    pub phone_number: String,
    pub previous_job: String,
    pub years_of_experience: String,
    pub email: String,
    pub job_vacancy: Option<String>,
}

impl JobApplication {
    /// Returns `None` unless every required parameter is present and non-empty.
    pub fn from_context(context: &OutputContext) -> Option<Self> {
        Some(Self {
            user_name: context.text_param("user-name")?,
            phone_number: context.text_param("phone-number")?,
            previous_job: context.text_param("previous-job")?,
            years_of_experience: context.text_param("years-of-experience")?,
            email: context.text_param("email_user")?,
            job_vacancy: context.text_param("job-vacancy"),
        })
    }

    pub fn summary(&self) -> String {
        let mut body = format!("A new job enquiry from {}.\n", self.user_name);
        if let Some(vacancy) = &self.job_vacancy {
            body.push_str(&format!("Position: {}.\n", vacancy));
        }
        body.push_str(&format!(
            "Previous job position: {}.\nYears of experience: {}.\nPhone number: {}.\nEmail: {}.\n",
            self.previous_job, self.years_of_experience, self.phone_number, self.email
        ));
        body
    }
}

pub struct ActionFlows {
    sequencer: ResponseSequencer,
    notifier: Arc<dyn EmailNotifier>,
    settings: ActionFlowSettings,
}

impl ActionFlows {
    pub fn new(
        sequencer: ResponseSequencer,
        notifier: Arc<dyn EmailNotifier>,
        settings: ActionFlowSettings,
    ) -> Self {
        Self {
            sequencer,
            notifier,
            settings,
        }
    }

    pub async fn run(&self, action: &str, turn: &TurnResult, sender: &SenderId) -> ActionOutcome {
        let context = turn.primary_context();
        tracing::debug!(
            action,
            sender = %sender,
            context = context.map(|c| c.name.as_str()).unwrap_or("-"),
            "Handling NLU action"
        );

        match action {
            DETAILED_APPLICATION => self.detailed_application(turn, sender).await,
            FAQ_SHIPPING => self.faq_shipping(turn, sender),
            DRUG_CHECK => Self::drug_check(context, sender),
            BOOKING_DATA_COLLECTION => Self::booking_data_collection(context, sender),
            _ => ActionOutcome::Dispatch(self.sequencer.schedule(&turn.items, sender)),
        }
    }

    async fn detailed_application(&self, turn: &TurnResult, sender: &SenderId) -> ActionOutcome {
        let Some(context) = turn.primary_context().filter(|c| {
            c.has_parameters() && APPLICATION_CONTEXTS.iter().any(|name| c.name_contains(name))
        }) else {
            return ActionOutcome::Completed;
        };

        let Some(application) = JobApplication::from_context(context) else {
            tracing::info!(sender = %sender, "Job application incomplete, not all parameters set");
            return ActionOutcome::Completed;
        };

        let notification = match &self.settings.notify_to {
            Some(to) => EmailNotification {
                to: to.clone(),
                reply_to: Some(application.email.clone()),
                subject: APPLICATION_SUBJECT.to_string(),
                body: application.summary(),
            },
            None => EmailNotification {
                to: application.email.clone(),
                reply_to: None,
                subject: APPLICATION_SUBJECT.to_string(),
                body: application.summary(),
            },
        };

        if let Err(error) = self.notifier.notify(notification).await {
            tracing::warn!(sender = %sender, error = %error, "Failed to send job application email");
        }

        ActionOutcome::Dispatch(self.sequencer.schedule(&turn.items, sender))
    }

    fn faq_shipping(&self, turn: &TurnResult, sender: &SenderId) -> ActionOutcome {
        let mut schedule = self.sequencer.schedule(&turn.items, sender);
        schedule.send_first(SendCommand::typing_on(sender));

        let buttons = self.shipping_buttons();
        schedule.push(ScheduledSend::new(
            self.settings.follow_up_delay,
            vec![SendCommand::ButtonTemplate {
                recipient: sender.clone(),
                text: "What would you like to do now?".to_string(),
                buttons,
            }],
        ));

        ActionOutcome::Dispatch(schedule)
    }

    fn shipping_buttons(&self) -> Vec<TemplateButton> {
        let mut buttons = Vec::with_capacity(3);

        if let Some(url) = &self.settings.shipping_tracking_url {
            buttons.push(TemplateButton::WebUrl {
                title: "Track my shipment".to_string(),
                url: url.clone(),
            });
        }
        if let Some(phone) = &self.settings.support_phone_number {
            buttons.push(TemplateButton::PhoneNumber {
                title: "Call us".to_string(),
                payload: phone.clone(),
            });
        }
        buttons.push(TemplateButton::Postback {
            title: "Chat with us".to_string(),
            payload: CHAT_PAYLOAD.to_string(),
        });

        buttons
    }

    fn drug_check(context: Option<&OutputContext>, sender: &SenderId) -> ActionOutcome {
        match context.filter(|c| c.name_contains("out_ricetta_no") && c.has_parameters()) {
            Some(context) => {
                tracing::info!(
                    sender = %sender,
                    drug = context.text_param("farmacoscelto").as_deref().unwrap_or("-"),
                    "Drug check without prescription, firing follow-up event"
                );
                ActionOutcome::FollowUpEvent(DRUG_CHECK_FOLLOW_UP_EVENT.to_string())
            }
            None => ActionOutcome::Completed,
        }
    }

    fn booking_data_collection(context: Option<&OutputContext>, sender: &SenderId) -> ActionOutcome {
        if context.is_some_and(|c| c.name_contains("fine_raccolta")) {
            tracing::info!(sender = %sender, "Booking data collection complete");
        }
        ActionOutcome::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::LoggingEmailNotifier;
    use crate::domain::conversation::TurnItem;
    use crate::domain::dispatch::Pacing;

    fn flows(settings: ActionFlowSettings) -> (ActionFlows, LoggingEmailNotifier) {
        let notifier = LoggingEmailNotifier::new();
        let flows = ActionFlows::new(
            ResponseSequencer::new(Pacing::default()),
            Arc::new(notifier.clone()),
            settings,
        );
        (flows, notifier)
    }

    fn sender() -> SenderId {
        SenderId::new("u-1")
    }

    fn application_context() -> OutputContext {
        OutputContext::new("projects/p/agent/sessions/s/contexts/job-application")
            .with_parameter("user-name", "Jane")
            .with_parameter("phone-number", "+39 000")
            .with_parameter("previous-job", "Barista")
            .with_parameter("years-of-experience", "3")
            .with_parameter("email_user", "jane@example.com")
    }

    fn turn(action: &str, context: OutputContext) -> TurnResult {
        TurnResult {
            action: Some(action.to_string()),
            items: vec![TurnItem::text(["Thanks!"])],
            output_contexts: vec![context],
            ..Default::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // detailed-application
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn complete_application_emails_and_dispatches() {
        let (flows, notifier) = flows(ActionFlowSettings {
            notify_to: Some("hr@example.com".to_string()),
            ..Default::default()
        });

        let outcome = flows
            .run(DETAILED_APPLICATION, &turn(DETAILED_APPLICATION, application_context()), &sender())
            .await;

        let ActionOutcome::Dispatch(schedule) = outcome else {
            panic!("expected dispatch, got {:?}", outcome);
        };
        assert_eq!(schedule.command_count(), 1);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "hr@example.com");
        assert_eq!(sent[0].reply_to.as_deref(), Some("jane@example.com"));
        assert!(sent[0].body.contains("Jane"));
        assert!(sent[0].body.contains("Barista"));
    }

    #[tokio::test]
    async fn application_without_notify_address_goes_to_applicant() {
        let (flows, notifier) = flows(ActionFlowSettings::default());

        flows
            .run(DETAILED_APPLICATION, &turn(DETAILED_APPLICATION, application_context()), &sender())
            .await;

        assert_eq!(notifier.sent()[0].to, "jane@example.com");
    }

    #[tokio::test]
    async fn numeric_experience_still_completes_the_application() {
        let (flows, notifier) = flows(ActionFlowSettings::default());
        let context = application_context().with_parameter("years-of-experience", 3.0);

        let outcome = flows
            .run(DETAILED_APPLICATION, &turn(DETAILED_APPLICATION, context), &sender())
            .await;

        assert!(matches!(outcome, ActionOutcome::Dispatch(ref schedule) if schedule.len() == 1));
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("Years of experience: 3."));
    }

    #[tokio::test]
    async fn incomplete_application_sends_nothing() {
        let (flows, notifier) = flows(ActionFlowSettings::default());
        let context = OutputContext::new("ctx/job-application")
            .with_parameter("user-name", "Jane")
            .with_parameter("phone-number", "");

        let outcome = flows
            .run(DETAILED_APPLICATION, &turn(DETAILED_APPLICATION, context), &sender())
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn application_in_unrelated_context_is_ignored() {
        let (flows, notifier) = flows(ActionFlowSettings::default());
        let mut context = application_context();
        context.name = "ctx/smalltalk".to_string();

        let outcome = flows
            .run(DETAILED_APPLICATION, &turn(DETAILED_APPLICATION, context), &sender())
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn job_vacancy_is_optional() {
        let application = JobApplication::from_context(&application_context()).unwrap();
        assert_eq!(application.job_vacancy, None);
        assert!(!application.summary().contains("Position"));

        let with_vacancy = application_context().with_parameter("job-vacancy", "Chef");
        let application = JobApplication::from_context(&with_vacancy).unwrap();
        assert!(application.summary().contains("Position: Chef."));
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // faq-spedizione
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn shipping_faq_appends_typing_and_delayed_buttons() {
        let (flows, _) = flows(ActionFlowSettings {
            shipping_tracking_url: Some("https://track.example".to_string()),
            support_phone_number: Some("+390000".to_string()),
            ..Default::default()
        });

        let outcome = flows
            .run(FAQ_SHIPPING, &turn(FAQ_SHIPPING, OutputContext::new("ctx")), &sender())
            .await;

        let ActionOutcome::Dispatch(schedule) = outcome else {
            panic!("expected dispatch, got {:?}", outcome);
        };
        assert_eq!(schedule.lead(), &[SendCommand::typing_on(&sender())]);
        let sends = schedule.sends();
        assert_eq!(sends.len(), 2);
        assert_eq!(sends[1].delay, Duration::from_millis(3000));

        let SendCommand::ButtonTemplate { text, buttons, .. } = &sends[1].commands[0] else {
            panic!("expected button template");
        };
        assert_eq!(text, "What would you like to do now?");
        assert_eq!(buttons.len(), 3);
        assert!(matches!(&buttons[0], TemplateButton::WebUrl { url, .. } if url == "https://track.example"));
        assert!(matches!(&buttons[1], TemplateButton::PhoneNumber { payload, .. } if payload == "+390000"));
        assert!(matches!(&buttons[2], TemplateButton::Postback { payload, .. } if payload == CHAT_PAYLOAD));
    }

    #[tokio::test]
    async fn shipping_faq_omits_unconfigured_buttons() {
        let (flows, _) = flows(ActionFlowSettings::default());

        let outcome = flows
            .run(FAQ_SHIPPING, &turn(FAQ_SHIPPING, OutputContext::new("ctx")), &sender())
            .await;

        let ActionOutcome::Dispatch(schedule) = outcome else {
            panic!("expected dispatch");
        };
        let last = schedule.sends().last().unwrap();
        let SendCommand::ButtonTemplate { buttons, .. } = &last.commands[0] else {
            panic!("expected button template");
        };
        assert_eq!(buttons.len(), 1);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // verificaFarmaco / actionRaccoltaDatiPrenotazione / default
    // ═══════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn drug_check_without_prescription_fires_follow_up() {
        let (flows, _) = flows(ActionFlowSettings::default());
        let context = OutputContext::new("ctx/out_ricetta_no").with_parameter("farmacoscelto", "aspirina");

        let outcome = flows.run(DRUG_CHECK, &turn(DRUG_CHECK, context), &sender()).await;

        assert_eq!(
            outcome,
            ActionOutcome::FollowUpEvent(DRUG_CHECK_FOLLOW_UP_EVENT.to_string())
        );
    }

    #[tokio::test]
    async fn drug_check_in_other_context_completes() {
        let (flows, _) = flows(ActionFlowSettings::default());
        let context = OutputContext::new("ctx/out_ricetta_si").with_parameter("farmacoscelto", "x");

        let outcome = flows.run(DRUG_CHECK, &turn(DRUG_CHECK, context), &sender()).await;

        assert_eq!(outcome, ActionOutcome::Completed);
    }

    #[tokio::test]
    async fn booking_collection_sends_nothing() {
        let (flows, _) = flows(ActionFlowSettings::default());
        let context = OutputContext::new("ctx/fine_raccolta").with_parameter("date", "2024-01-01");

        let outcome = flows
            .run(BOOKING_DATA_COLLECTION, &turn(BOOKING_DATA_COLLECTION, context), &sender())
            .await;

        assert_eq!(outcome, ActionOutcome::Completed);
    }

    #[tokio::test]
    async fn unknown_action_dispatches_items() {
        let (flows, _) = flows(ActionFlowSettings::default());

        let outcome = flows
            .run("input.welcome", &turn("input.welcome", OutputContext::new("ctx")), &sender())
            .await;

        let ActionOutcome::Dispatch(schedule) = outcome else {
            panic!("expected dispatch");
        };
        assert_eq!(
            schedule.commands().cloned().collect::<Vec<_>>(),
            vec![SendCommand::text(&sender(), "Thanks!")]
        );
    }
}
