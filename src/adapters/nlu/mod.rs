//! NLU client adapters.
//!
//! - `DialogflowClient` - Dialogflow ES v2 REST API
//! - `MockNluClient` - Scripted client for tests

mod dialogflow_client;
mod dialogflow_types;
mod mock;
mod service_account;

pub use dialogflow_client::{DialogflowClient, DialogflowConfig};
pub use mock::MockNluClient;
pub use service_account::{
    AccessTokenSource, ServiceAccountKey, ServiceAccountTokenSource, StaticToken, DIALOGFLOW_SCOPE,
};
