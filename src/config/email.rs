//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Send notification emails; when off they are only logged
    #[serde(default)]
    pub enabled: bool,

    /// Resend API key
    #[serde(default)]
    pub resend_api_key: String,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Recipient of job application summaries
    pub notify_to: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(to) = &self.notify_to {
            if !to.contains('@') {
                return Err(ValidationError::InvalidNotifyEmail);
            }
        }
        if !self.enabled {
            return Ok(());
        }
        if self.resend_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
        }
        if !self.resend_api_key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            resend_api_key: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            notify_to: None,
            api_base: default_api_base(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@messenger-relay.local".to_string()
}

fn default_from_name() -> String {
    "Messenger Relay".to_string()
}

fn default_api_base() -> String {
    "https://api.resend.com".to_string()
}
