//! Google service-account authentication.
//!
//! Signs an RS256 JWT assertion with the service account's private key and
//! exchanges it for an OAuth2 access token. The token is cached until one
//! minute before it expires.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::ports::NluError;

/// OAuth scope required by the detectIntent endpoint.
pub const DIALOGFLOW_SCOPE: &str = "https://www.googleapis.com/auth/dialogflow";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime requested from the token endpoint.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Source of bearer tokens for the NLU API.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<Secret<String>, NluError>;
}

/// A fixed token, for local runs against an emulator and for tests.
pub struct StaticToken(Secret<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<Secret<String>, NluError> {
        Ok(Secret::new(self.0.expose_secret().clone()))
    }
}

/// Service-account key material.
#[derive(Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: Secret<String>,
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Accepts PEM keys whose newlines were escaped as `\n` in an
    /// environment variable.
    pub fn new(
        client_email: impl Into<String>,
        private_key: &str,
        token_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: Secret::new(private_key.replace("\\n", "\n")),
            token_uri: token_uri.into(),
        }
    }

    fn encoding_key(&self) -> Result<EncodingKey, NluError> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes())
            .map_err(|e| NluError::authentication(format!("Invalid service account key: {}", e)))
    }
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    token: Secret<String>,
    refresh_at: DateTime<Utc>,
}

/// Access tokens minted from a service-account key.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    pub fn new(key: ServiceAccountKey, client: Client) -> Self {
        Self {
            key,
            client,
            cached: RwLock::new(None),
        }
    }

    fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, NluError> {
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: DIALOGFLOW_SCOPE.to_string(),
            aud: self.key.token_uri.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key.encoding_key()?,
        )
        .map_err(|e| NluError::authentication(format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> Result<CachedToken, NluError> {
        let now = Utc::now();
        let assertion = self.sign_assertion(now)?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| NluError::network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, "Service account token exchange failed");
            return Err(NluError::authentication(format!(
                "Token endpoint returned {}: {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| NluError::authentication(format!("Malformed token response: {}", e)))?;

        tracing::debug!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained NLU access token"
        );

        Ok(CachedToken {
            token: Secret::new(token.access_token),
            refresh_at: now + ChronoDuration::seconds(token.expires_in - REFRESH_MARGIN_SECS),
        })
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<Secret<String>, NluError> {
        if let Some(cached) = self.cached.read().await.as_ref() {
            if Utc::now() < cached.refresh_at {
                return Ok(Secret::new(cached.token.expose_secret().clone()));
            }
        }

        let mut cached = self.cached.write().await;
        if let Some(existing) = cached.as_ref() {
            if Utc::now() < existing.refresh_at {
                return Ok(Secret::new(existing.token.expose_secret().clone()));
            }
        }

        let fresh = self.fetch_token().await?;
        let token = Secret::new(fresh.token.expose_secret().clone());
        *cached = Some(fresh);
        Ok(token)
    }
}
