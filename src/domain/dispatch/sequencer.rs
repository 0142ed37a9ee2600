//! Response dispatch sequencer.
//!
//! Converts the reply items of one turn into a paced schedule of sends:
//!
//! 1. Consecutive cards are batched into a single gallery unit. A run of
//!    cards that ends the turn is flushed as soon as its last card is seen.
//! 2. Every other item becomes a single unit of its own.
//! 3. Each unit gets a delay according to the configured [`PacingStrategy`].
//! 4. Units are materialized into [`SendCommand`]s addressed to the sender.
//!
//! The sequencer never sleeps: it returns a [`DispatchSchedule`] that a
//! scheduler executes on the runtime.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::conversation::{Card, TurnItem};
use crate::domain::foundation::SenderId;

use super::gallery::build_gallery;
use super::schedule::{DispatchSchedule, ScheduledSend};
use super::send_command::{QuickReplyOption, SendCommand};

/// Default spacing between paced sends.
pub const DEFAULT_SEND_INTERVAL: Duration = Duration::from_millis(1100);

/// How unit delays are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingStrategy {
    /// Delay follows the original item index: a single at index `i` fires at
    /// `i * interval`, a gallery closed at index `i` fires at
    /// `(i - 1) * interval`, saturating at zero.
    #[default]
    SourceIndex,

    /// Unit `j` of the compacted plan fires at `j * interval`.
    Sequential,
}

/// Pacing parameters for one sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub strategy: PacingStrategy,
    pub interval: Duration,
}

impl Pacing {
    pub fn new(strategy: PacingStrategy, interval: Duration) -> Self {
        Self { strategy, interval }
    }

    fn delay_for(&self, tick: usize) -> Duration {
        self.interval
            .saturating_mul(u32::try_from(tick).unwrap_or(u32::MAX))
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(PacingStrategy::default(), DEFAULT_SEND_INTERVAL)
    }
}

/// One independently scheduled package of outbound messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendUnit {
    /// Any non-card item.
    Single(TurnItem),
    /// A non-empty run of consecutive cards.
    Gallery(Vec<Card>),
}

impl SendUnit {
    /// Materializes the unit into the commands it sends, in order.
    ///
    /// Text yields one command per non-empty line. Unsupported items yield
    /// nothing.
    pub fn commands(&self, recipient: &SenderId) -> Vec<SendCommand> {
        match self {
            SendUnit::Gallery(cards) => vec![build_gallery(recipient, cards)],
            SendUnit::Single(TurnItem::Text { lines }) => lines
                .iter()
                .filter(|line| !line.is_empty())
                .map(|line| SendCommand::text(recipient, line.as_str()))
                .collect(),
            SendUnit::Single(TurnItem::QuickReplies { title, options }) => {
                vec![SendCommand::QuickReplies {
                    recipient: recipient.clone(),
                    text: title.clone(),
                    replies: options
                        .iter()
                        .map(|option| QuickReplyOption::verbatim(option.as_str()))
                        .collect(),
                }]
            }
            SendUnit::Single(TurnItem::Image { uri }) => vec![SendCommand::Image {
                recipient: recipient.clone(),
                url: uri.clone(),
            }],
            // Cards only ever travel inside a gallery.
            SendUnit::Single(TurnItem::Card(card)) => {
                vec![build_gallery(recipient, std::slice::from_ref(card))]
            }
            SendUnit::Single(TurnItem::Unsupported { kind }) => {
                tracing::debug!(kind = %kind, "Skipping unsupported reply item");
                Vec::new()
            }
        }
    }
}

/// A send unit together with its delay from dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUnit {
    pub unit: SendUnit,
    pub delay: Duration,
}

/// Ordered send units for one turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPlan {
    units: Vec<PlannedUnit>,
}

impl DispatchPlan {
    /// Groups and paces the items of one turn.
    pub fn build(items: &[TurnItem], pacing: Pacing) -> Self {
        let last = items.len().saturating_sub(1);
        let mut pending: Vec<Card> = Vec::new();
        // (unit, original index the unit is anchored on)
        let mut anchored: Vec<(SendUnit, usize)> = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match item {
                TurnItem::Card(card) => {
                    pending.push(card.clone());
                    if index == last {
                        anchored.push((
                            SendUnit::Gallery(std::mem::take(&mut pending)),
                            index.saturating_sub(1),
                        ));
                    }
                }
                other => {
                    if !pending.is_empty() {
                        anchored.push((
                            SendUnit::Gallery(std::mem::take(&mut pending)),
                            index.saturating_sub(1),
                        ));
                    }
                    anchored.push((SendUnit::Single(other.clone()), index));
                }
            }
        }

        let units = anchored
            .into_iter()
            .enumerate()
            .map(|(position, (unit, source_index))| {
                let tick = match pacing.strategy {
                    PacingStrategy::SourceIndex => source_index,
                    PacingStrategy::Sequential => position,
                };
                PlannedUnit {
                    unit,
                    delay: pacing.delay_for(tick),
                }
            })
            .collect();

        Self { units }
    }

    pub fn units(&self) -> &[PlannedUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Materializes every unit for the recipient.
    ///
    /// Units that produce no commands are dropped from the schedule.
    pub fn into_schedule(self, recipient: &SenderId) -> DispatchSchedule {
        self.units
            .into_iter()
            .filter_map(|planned| {
                let commands = planned.unit.commands(recipient);
                (!commands.is_empty()).then(|| ScheduledSend::new(planned.delay, commands))
            })
            .collect()
    }
}

/// Entry point used by the turn handler: plan, pace and materialize.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSequencer {
    pacing: Pacing,
}

impl ResponseSequencer {
    pub fn new(pacing: Pacing) -> Self {
        Self { pacing }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub fn plan(&self, items: &[TurnItem]) -> DispatchPlan {
        DispatchPlan::build(items, self.pacing)
    }

    pub fn schedule(&self, items: &[TurnItem], recipient: &SenderId) -> DispatchSchedule {
        let plan = self.plan(items);
        tracing::debug!(
            recipient = %recipient,
            items = items.len(),
            units = plan.len(),
            "Built dispatch plan"
        );
        plan.into_schedule(recipient)
    }
}
