//! Resend email notifier.
//!
//! Posts plain-text notifications to the Resend `/emails` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::ports::{EmailError, EmailNotification, EmailNotifier};

/// Resend API settings.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    api_key: Secret<String>,
    /// `"Name <address>"`
    pub from: String,
    /// Base URL (default: https://api.resend.com).
    pub api_base: String,
}

impl ResendConfig {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from: from.into(),
            api_base: "https://api.resend.com".to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    text: &'a str,
}

pub struct ResendEmailNotifier {
    config: ResendConfig,
    client: Client,
}

impl ResendEmailNotifier {
    pub fn new(config: ResendConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmailNotifier for ResendEmailNotifier {
    async fn notify(&self, notification: EmailNotification) -> Result<(), EmailError> {
        let body = SendEmailBody {
            from: &self.config.from,
            to: [notification.to.as_str()],
            reply_to: notification.reply_to.as_deref(),
            subject: &notification.subject,
            text: &notification.body,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                error = %error_text,
                "Resend rejected notification email"
            );
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                message: error_text,
            });
        }

        tracing::info!(to = %notification.to, subject = %notification.subject, "Notification email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_serializes_reply_to_only_when_set() {
        let body = SendEmailBody {
            from: "Relay <bot@example.com>",
            to: ["hr@example.com"],
            reply_to: None,
            subject: "New job application",
            text: "details",
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "from": "Relay <bot@example.com>",
                "to": ["hr@example.com"],
                "subject": "New job application",
                "text": "details"
            })
        );

        let with_reply = SendEmailBody {
            reply_to: Some("jane@example.com"),
            ..body
        };
        assert_eq!(
            serde_json::to_value(&with_reply).unwrap()["reply_to"],
            "jane@example.com"
        );
    }

    #[test]
    fn emails_url_uses_api_base() {
        let notifier = ResendEmailNotifier::new(
            ResendConfig::new("re_x", "a <b@c>").with_api_base("http://localhost:3000/"),
            Client::new(),
        );
        assert_eq!(notifier.emails_url(), "http://localhost:3000/emails");
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_network_error() {
        let notifier = ResendEmailNotifier::new(
            ResendConfig::new("re_x", "a <b@c>").with_api_base("http://127.0.0.1:1"),
            Client::new(),
        );

        let result = notifier
            .notify(EmailNotification {
                to: "hr@example.com".to_string(),
                reply_to: None,
                subject: "s".to_string(),
                body: "b".to_string(),
            })
            .await;

        assert!(matches!(result, Err(EmailError::Network(_))));
    }
}
