//! NLU (Dialogflow) configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Dialogflow agent and service account settings
#[derive(Clone, Deserialize)]
pub struct NluConfig {
    /// Google Cloud project that owns the agent
    pub project_id: String,

    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Service account email (`client_email` in the key file)
    pub client_email: String,

    /// PEM private key; `\n` escapes are accepted
    pub private_key: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl NluConfig {
    /// Validate NLU configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::MissingRequired("NLU__PROJECT_ID"));
        }
        if self.language_code.is_empty() {
            return Err(ValidationError::MissingRequired("NLU__LANGUAGE_CODE"));
        }
        if !self.client_email.contains('@') {
            return Err(ValidationError::InvalidServiceAccountEmail);
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(ValidationError::InvalidPrivateKey);
        }
        if !self.api_base.starts_with("http") {
            return Err(ValidationError::InvalidUrl("NLU__API_BASE"));
        }
        if !self.token_uri.starts_with("http") {
            return Err(ValidationError::InvalidUrl("NLU__TOKEN_URI"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl std::fmt::Debug for NluConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NluConfig")
            .field("project_id", &self.project_id)
            .field("language_code", &self.language_code)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("token_uri", &self.token_uri)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_api_base() -> String {
    "https://dialogflow.googleapis.com".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_timeout() -> u64 {
    15
}
