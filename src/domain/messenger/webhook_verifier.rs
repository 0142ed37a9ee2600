//! Messenger webhook signature verification.
//!
//! Every webhook delivery is signed with the app secret. The platform sends
//! `X-Hub-Signature-256: sha256=<hex>`, an HMAC-SHA256 of the raw body.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::inbound::WebhookPayload;
use super::webhook_errors::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Only accepted signature method.
const SIGNATURE_METHOD: &str = "sha256";

/// Parsed `X-Hub-Signature-256` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub signature: Vec<u8>,
}

impl SignatureHeader {
    /// Parses a `sha256=<hex>` header value.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedSignature` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let (method, hash) = header
            .split_once('=')
            .ok_or_else(|| WebhookError::MalformedSignature("missing '='".to_string()))?;

        if method != SIGNATURE_METHOD {
            return Err(WebhookError::MalformedSignature(format!(
                "unsupported signature method: {method}"
            )));
        }

        let signature = hex::decode(hash)
            .map_err(|_| WebhookError::MalformedSignature("invalid hex".to_string()))?;

        Ok(Self { signature })
    }
}

/// Verifier for Messenger webhook signatures.
pub struct MessengerSignatureVerifier {
    /// App secret from the Meta app dashboard.
    app_secret: Secret<String>,
}

impl MessengerSignatureVerifier {
    /// Creates a new verifier with the given app secret.
    pub fn new(app_secret: impl Into<String>) -> Self {
        Self {
            app_secret: Secret::new(app_secret.into()),
        }
    }

    /// Checks the signature of a raw webhook body.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - no header was sent
    /// - `MalformedSignature` - header is malformed
    /// - `InvalidSignature` - HMAC mismatch
    pub fn verify(&self, payload: &[u8], signature_header: Option<&str>) -> Result<(), WebhookError> {
        let header = signature_header.ok_or(WebhookError::MissingSignature)?;
        let header = SignatureHeader::parse(header)?;

        let expected = self.compute_signature(payload)?;
        if !constant_time_compare(&expected, &header.signature) {
            tracing::warn!("Rejected webhook with mismatched signature");
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Verifies the signature and parses the payload.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: Option<&str>,
    ) -> Result<WebhookPayload, WebhookError> {
        self.verify(payload, signature_header)?;

        serde_json::from_slice(payload).map_err(|e| WebhookError::ParseError(e.to_string()))
    }

    fn compute_signature(&self, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.app_secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes a `sha256=<hex>` header value for test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(payload.as_bytes());
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}
