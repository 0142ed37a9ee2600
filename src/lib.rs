//! Messenger Relay - Messenger Platform to Dialogflow webhook relay
//!
//! This crate receives Messenger webhook events, forwards user input to a
//! Dialogflow agent, and relays the agent's reply items back through the
//! Send API, batching consecutive cards into galleries and pacing the sends.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
