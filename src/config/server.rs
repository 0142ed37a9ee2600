//! HTTP listener settings for the webhook endpoint.
//!
//! Messenger delivers webhooks to `host:port` and retries deliveries that
//! are not acknowledged quickly, so the webhook answers as soon as the
//! signature checks out and the request timeout only bounds slow clients.

use serde::Deserialize;
use std::net::SocketAddr;

use super::error::ValidationError;

/// Where the webhook listens and how the process logs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address. Must be an IP literal; hostnames are rejected.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listener port, 5000 by default.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment. Production switches logs to JSON.
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on one HTTP request, in seconds (1..=300).
    ///
    /// Event processing runs after the response, so this never bounds NLU
    /// calls or paced sends.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Socket address for the listener.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Rejects port 0, timeouts outside 1..=300 seconds and non-IP hosts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,messenger_relay=debug,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    20
}
