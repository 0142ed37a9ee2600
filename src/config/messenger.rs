//! Messenger platform configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Messenger page and app credentials
#[derive(Clone, Deserialize)]
pub struct MessengerConfig {
    /// Page access token used for the Send API
    pub page_access_token: String,

    /// Token echoed back during the webhook subscription handshake
    pub verify_token: String,

    /// App secret that signs webhook deliveries
    pub app_secret: String,

    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,

    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,

    /// Log outbound messages instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

impl MessengerConfig {
    /// Validate messenger configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.verify_token.is_empty() {
            return Err(ValidationError::MissingRequired("MESSENGER__VERIFY_TOKEN"));
        }
        if self.app_secret.is_empty() {
            return Err(ValidationError::MissingRequired("MESSENGER__APP_SECRET"));
        }
        // A dry run never talks to the Send API
        if self.page_access_token.is_empty() && !self.dry_run {
            return Err(ValidationError::MissingRequired("MESSENGER__PAGE_ACCESS_TOKEN"));
        }
        if !self.graph_api_base.starts_with("http://") && !self.graph_api_base.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("MESSENGER__GRAPH_API_BASE"));
        }
        if !self.graph_api_version.starts_with('v') {
            return Err(ValidationError::InvalidGraphApiVersion);
        }
        Ok(())
    }
}

impl std::fmt::Debug for MessengerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessengerConfig")
            .field("page_access_token", &"[REDACTED]")
            .field("verify_token", &"[REDACTED]")
            .field("app_secret", &"[REDACTED]")
            .field("graph_api_base", &self.graph_api_base)
            .field("graph_api_version", &self.graph_api_version)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

fn default_graph_api_base() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_graph_api_version() -> String {
    "v3.2".to_string()
}
