//! Conversation module - what the NLU service says back for one turn.
//!
//! A turn result is an ordered list of heterogeneous reply items plus the
//! action and context state the agent exposes for multi-turn flows.

mod turn_item;
mod turn_result;

pub use turn_item::{Button, ButtonAction, Card, TurnItem};
pub use turn_result::{OutputContext, TurnResult};
