//! Email notifier that only logs.
//!
//! Used when email delivery is disabled, and in tests to capture what would
//! have been sent.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{EmailError, EmailNotification, EmailNotifier};

#[derive(Debug, Clone, Default)]
pub struct LoggingEmailNotifier {
    sent: Arc<Mutex<Vec<EmailNotification>>>,
}

impl LoggingEmailNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<EmailNotification> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl EmailNotifier for LoggingEmailNotifier {
    async fn notify(&self, notification: EmailNotification) -> Result<(), EmailError> {
        tracing::info!(
            to = %notification.to,
            reply_to = notification.reply_to.as_deref().unwrap_or("-"),
            subject = %notification.subject,
            "Email delivery disabled, notification logged only"
        );

        let mut sent = self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sent.push(notification);
        Ok(())
    }
}
