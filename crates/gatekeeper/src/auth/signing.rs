//! Signing configuration shared by the token issuer and the token gate.

use secrecy::{ExposeSecret, SecretBox};
use std::time::Duration;

/// Key material and identity that minting and verification must agree on.
///
/// Immutable once built. The key is wrapped in a `SecretBox` so it is
/// redacted from Debug output and zeroized on drop.
#[derive(Debug)]
pub struct SigningConfig {
    key: SecretBox<[u8]>,
    issuer: String,
    audiences: Vec<String>,
    lifetime: Duration,
}

impl SigningConfig {
    /// Create a signing configuration.
    ///
    /// No validation happens here; `TokenGate::new` rejects unusable values
    /// and `TokenIssuer` refuses to sign with an empty key.
    pub fn new(key: &[u8], issuer: String, audiences: Vec<String>, lifetime: Duration) -> Self {
        Self {
            key: SecretBox::new(Box::from(key)),
            issuer,
            audiences,
            lifetime,
        }
    }

    /// Raw HMAC key bytes.
    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// All accepted audiences, in configuration order.
    pub fn audiences(&self) -> &[String] {
        &self.audiences
    }

    /// Audience written into minted tokens.
    pub fn primary_audience(&self) -> Option<&str> {
        self.audiences.first().map(String::as_str)
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}
