//! Graph Send API adapter.
//!
//! Implements [`SendAdapter`] by posting to `/{version}/me/messages` with the
//! page access token.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GraphApiConfig::new(page_access_token)
//!     .with_api_version("v3.2");
//! let adapter = GraphSendAdapter::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::domain::dispatch::SendCommand;
use crate::ports::{SendAdapter, SendError, SendReceipt};

use super::wire::{GraphErrorResponse, SendApiRequest, SendApiResponse};

/// Configuration for the Graph Send API.
#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    page_access_token: Secret<String>,
    /// Base URL (default: https://graph.facebook.com).
    pub base_url: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl GraphApiConfig {
    pub fn new(page_access_token: impl Into<String>) -> Self {
        Self {
            page_access_token: Secret::new(page_access_token.into()),
            base_url: "https://graph.facebook.com".to_string(),
            api_version: "v3.2".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/me/messages",
            self.base_url.trim_end_matches('/'),
            self.api_version
        )
    }
}

/// Live Send API adapter.
pub struct GraphSendAdapter {
    config: GraphApiConfig,
    client: Client,
}

impl GraphSendAdapter {
    pub fn new(config: GraphApiConfig) -> Result<Self, SendError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SendError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl SendAdapter for GraphSendAdapter {
    async fn send(&self, command: &SendCommand) -> Result<SendReceipt, SendError> {
        let body = SendApiRequest::from(command);

        let response = self
            .client
            .post(self.config.messages_url())
            .query(&[("access_token", self.config.page_access_token.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GraphErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);

            tracing::warn!(
                status = status.as_u16(),
                kind = command.kind(),
                recipient = %command.recipient(),
                error = %message,
                "Send API request failed"
            );
            return Err(SendError::rejected(status.as_u16(), message));
        }

        let parsed: SendApiResponse = response
            .json()
            .await
            .map_err(|e| SendError::Parse(e.to_string()))?;

        tracing::debug!(
            kind = command.kind(),
            recipient = %command.recipient(),
            message_id = parsed.message_id.as_deref().unwrap_or("-"),
            "Send API request succeeded"
        );

        Ok(SendReceipt {
            recipient_id: parsed.recipient_id,
            message_id: parsed.message_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_uses_version() {
        let config = GraphApiConfig::new("token").with_api_version("v19.0");
        assert_eq!(
            config.messages_url(),
            "https://graph.facebook.com/v19.0/me/messages"
        );
    }

    #[test]
    fn messages_url_tolerates_trailing_slash() {
        let config = GraphApiConfig::new("token").with_base_url("http://localhost:9999/");
        assert_eq!(config.messages_url(), "http://localhost:9999/v3.2/me/messages");
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let config = GraphApiConfig::new("EAAB-secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("EAAB-secret-token"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let config = GraphApiConfig::new("token")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(500));
        let adapter = GraphSendAdapter::new(config).unwrap();

        let command = SendCommand::text(&"user".into(), "hi");
        let result = adapter.send(&command).await;

        assert!(matches!(result, Err(SendError::Network(_))));
    }
}
