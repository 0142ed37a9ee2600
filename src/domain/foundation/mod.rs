//! Foundation module - Shared domain primitives.
//!
//! Identifiers that every other domain module speaks in.

mod ids;

pub use ids::{SenderId, SessionId};
