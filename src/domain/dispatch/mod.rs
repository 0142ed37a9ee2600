//! Dispatch module - from reply items to paced outbound sends.
//!
//! - `sequencer` - groups, paces and materializes the items of one turn
//! - `gallery` - batches consecutive cards into one generic template
//! - `send_command` - the outbound command vocabulary
//! - `schedule` - `(delay, commands)` pairs handed to the scheduler

mod gallery;
mod schedule;
mod send_command;
mod sequencer;

pub use gallery::build_gallery;
pub use schedule::{DispatchSchedule, ScheduledSend};
pub use send_command::{
    GalleryElement, QuickReplyOption, SendCommand, SenderAction, TemplateButton,
};
pub use sequencer::{
    DispatchPlan, Pacing, PacingStrategy, PlannedUnit, ResponseSequencer, SendUnit,
    DEFAULT_SEND_INTERVAL,
};
