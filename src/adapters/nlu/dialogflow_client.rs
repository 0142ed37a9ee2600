//! Dialogflow ES detectIntent client.
//!
//! # Configuration
//!
//! ```ignore
//! let key = ServiceAccountKey::new(client_email, &private_key, token_uri);
//! let config = DialogflowConfig::new(project_id).with_language_code("it");
//! let client = DialogflowClient::with_service_account(config, key)?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;

use crate::domain::conversation::TurnResult;
use crate::ports::{DetectIntentRequest, NluClient, NluError};

use super::dialogflow_types::{DetectIntentBody, DetectIntentResponseDto, GoogleErrorResponse};
use super::service_account::{AccessTokenSource, ServiceAccountKey, ServiceAccountTokenSource};

/// Configuration for the Dialogflow client.
#[derive(Debug, Clone)]
pub struct DialogflowConfig {
    pub project_id: String,
    pub language_code: String,
    /// Base URL (default: https://dialogflow.googleapis.com).
    pub api_base: String,
    pub timeout: Duration,
}

impl DialogflowConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            language_code: "en-US".to_string(),
            api_base: "https://dialogflow.googleapis.com".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_language_code(mut self, language_code: impl Into<String>) -> Self {
        self.language_code = language_code.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api_base}/v2/projects/{project}/agent/sessions/{session}:detectIntent`
    fn detect_intent_url(&self, session: &str) -> String {
        format!(
            "{}/v2/projects/{}/agent/sessions/{}:detectIntent",
            self.api_base.trim_end_matches('/'),
            self.project_id,
            session
        )
    }
}

/// NLU client backed by the Dialogflow REST API.
pub struct DialogflowClient {
    config: DialogflowConfig,
    client: Client,
    tokens: Arc<dyn AccessTokenSource>,
}

impl DialogflowClient {
    pub fn new(
        config: DialogflowConfig,
        client: Client,
        tokens: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            config,
            client,
            tokens,
        }
    }

    /// Builds a client that authenticates with a service-account key.
    pub fn with_service_account(
        config: DialogflowConfig,
        key: ServiceAccountKey,
    ) -> Result<Self, NluError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NluError::network(format!("Failed to create HTTP client: {}", e)))?;
        let tokens = Arc::new(ServiceAccountTokenSource::new(key, client.clone()));

        Ok(Self::new(config, client, tokens))
    }
}

#[async_trait]
impl NluClient for DialogflowClient {
    async fn detect_intent(&self, request: DetectIntentRequest) -> Result<TurnResult, NluError> {
        let token = self.tokens.access_token().await?;
        let url = self
            .config
            .detect_intent_url(&request.session_id.to_string());
        let body = DetectIntentBody::new(&request.query, &self.config.language_code);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NluError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GoogleErrorResponse>(&error_text)
                .map(|e| e.error.message)
                .unwrap_or(error_text);

            tracing::warn!(
                status = status.as_u16(),
                session = %request.session_id,
                error = %message,
                "detectIntent request failed"
            );
            return Err(NluError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DetectIntentResponseDto = response
            .json()
            .await
            .map_err(|e| NluError::parse(e.to_string()))?;

        let result = parsed
            .query_result
            .ok_or_else(|| NluError::parse("response has no queryResult"))?;

        tracing::debug!(
            session = %request.session_id,
            response_id = parsed.response_id.as_deref().unwrap_or("-"),
            action = result.action.as_deref().unwrap_or(""),
            messages = result.fulfillment_messages.len(),
            "detectIntent succeeded"
        );

        Ok(TurnResult::from(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::nlu::StaticToken;
    use crate::domain::foundation::SessionId;
    use crate::ports::QueryInput;

    #[test]
    fn detect_intent_url_shape() {
        let config = DialogflowConfig::new("my-agent");
        assert_eq!(
            config.detect_intent_url("abc"),
            "https://dialogflow.googleapis.com/v2/projects/my-agent/agent/sessions/abc:detectIntent"
        );
    }

    #[test]
    fn custom_api_base_is_trimmed() {
        let config = DialogflowConfig::new("p").with_api_base("http://localhost:8080/");
        assert_eq!(
            config.detect_intent_url("s"),
            "http://localhost:8080/v2/projects/p/agent/sessions/s:detectIntent"
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_a_network_error() {
        let config = DialogflowConfig::new("p")
            .with_api_base("http://127.0.0.1:1")
            .with_timeout(Duration::from_millis(500));
        let client = DialogflowClient::new(
            config,
            Client::new(),
            Arc::new(StaticToken::new("token")),
        );

        let result = client
            .detect_intent(DetectIntentRequest::new(
                SessionId::new(),
                QueryInput::text("hello"),
            ))
            .await;

        assert!(matches!(result, Err(NluError::Network(_))));
    }
}
