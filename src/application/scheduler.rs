//! DispatchScheduler - executes dispatch schedules on tokio timers.
//!
//! Every scheduled send becomes its own task that sleeps until
//! `dispatch time + delay` and then delivers its commands in order. Tasks
//! are independent: a failed send is logged and never affects siblings.

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::domain::dispatch::{DispatchSchedule, ScheduledSend, SendCommand};
use crate::ports::SendAdapter;

/// Runs schedules against a send adapter.
#[derive(Clone)]
pub struct DispatchScheduler {
    sender: Arc<dyn SendAdapter>,
}

impl DispatchScheduler {
    pub fn new(sender: Arc<dyn SendAdapter>) -> Self {
        Self { sender }
    }

    /// Sends the lead commands in the caller's task, then spawns one task per
    /// scheduled send. Delays are relative to the call.
    ///
    /// Dropping the returned handle does not cancel anything.
    pub async fn dispatch(&self, mut schedule: DispatchSchedule) -> DispatchHandle {
        let start = Instant::now();

        for command in schedule.take_lead() {
            deliver(self.sender.as_ref(), &command).await;
        }

        let tasks = schedule
            .into_iter()
            .map(|send| {
                let sender = Arc::clone(&self.sender);
                tokio::spawn(run_scheduled(sender, start, send))
            })
            .collect();

        DispatchHandle { tasks }
    }

    /// Sends one command right away, in the caller's task.
    pub async fn send_now(&self, command: SendCommand) {
        deliver(self.sender.as_ref(), &command).await;
    }
}

async fn run_scheduled(sender: Arc<dyn SendAdapter>, start: Instant, send: ScheduledSend) {
    sleep_until(start + send.delay).await;

    for command in &send.commands {
        deliver(sender.as_ref(), command).await;
    }
}

async fn deliver(sender: &dyn SendAdapter, command: &SendCommand) {
    if let Err(error) = sender.send(command).await {
        tracing::warn!(
            kind = command.kind(),
            recipient = %command.recipient(),
            error = %error,
            "Failed to deliver message"
        );
    }
}

/// The tasks spawned for one dispatch.
#[derive(Debug, Default)]
pub struct DispatchHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl DispatchHandle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Takes ownership of another dispatch's tasks.
    pub fn merge(&mut self, other: DispatchHandle) {
        self.tasks.extend(other.tasks);
    }

    /// Waits until every scheduled send has been attempted.
    pub async fn wait(self) {
        for result in join_all(self.tasks).await {
            if let Err(error) = result {
                tracing::error!(error = %error, "Dispatch task panicked");
            }
        }
    }
}
