//! Scripted NLU client for testing.
//!
//! Replays queued results in order and records every request.
//!
//! ```ignore
//! let nlu = MockNluClient::new()
//!     .with_result(TurnResult::with_items(vec![TurnItem::text(["hi"])]))
//!     .with_error(NluError::network("down"));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::conversation::TurnResult;
use crate::ports::{DetectIntentRequest, NluClient, NluError};

#[derive(Debug, Clone, Default)]
pub struct MockNluClient {
    responses: Arc<Mutex<VecDeque<Result<TurnResult, NluError>>>>,
    calls: Arc<Mutex<Vec<DetectIntentRequest>>>,
    delay: Duration,
}

impl MockNluClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(self, result: TurnResult) -> Self {
        lock(&self.responses).push_back(Ok(result));
        self
    }

    pub fn with_error(self, error: NluError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<DetectIntentRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl NluClient for MockNluClient {
    async fn detect_intent(&self, request: DetectIntentRequest) -> Result<TurnResult, NluError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        // An exhausted script answers like an agent with no matching intent.
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(TurnResult::default()))
    }
}
