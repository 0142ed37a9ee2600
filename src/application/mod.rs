//! Application layer - Handlers and the dispatch scheduler.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Domain code stays synchronous; timers and I/O live here and in adapters.

pub mod handlers;
pub mod scheduler;

pub use handlers::relay::{
    ActionFlowSettings, ActionFlows, EventDisposition, ProcessTurnCommand, ProcessTurnHandler,
    ProcessTurnResult, ReceiveWebhookHandler, ReceiveWebhookResult, TurnOutcome,
};
pub use scheduler::{DispatchHandle, DispatchScheduler};
