//! Builder patterns for test data construction
//!
//! Provides fluent APIs for creating test tokens, including ones the gate
//! is expected to reject.

use crate::server_harness::TEST_SIGNING_KEY;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;

/// Builder for creating test JWTs
///
/// Defaults match the harness server: issuer `my-app`, audience
/// `my-audience`, signed HS256 with `TEST_SIGNING_KEY`, valid for an hour.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .for_audience("someone-else")
///     .sign();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    iss: String,
    aud: serde_json::Value,
    exp: i64,
    iat: i64,
    omitted: Vec<String>,
    key: Vec<u8>,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-subject".to_string(),
            iss: "my-app".to_string(),
            aud: json!("my-audience"),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            omitted: Vec::new(),
            key: TEST_SIGNING_KEY.as_bytes().to_vec(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    /// Set the issuer
    pub fn issued_by(mut self, issuer: &str) -> Self {
        self.iss = issuer.to_string();
        self
    }

    /// Set a single string audience
    pub fn for_audience(mut self, audience: &str) -> Self {
        self.aud = json!(audience);
        self
    }

    /// Set the audience as a JSON array
    pub fn for_audiences(mut self, audiences: &[&str]) -> Self {
        self.aud = json!(audiences);
        self
    }

    /// Set expiration in seconds from now
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Expire the token one minute ago
    pub fn expired(self) -> Self {
        self.expires_in(-60)
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Leave `claim` out of the payload
    pub fn without_claim(mut self, claim: &str) -> Self {
        self.omitted.push(claim.to_string());
        self
    }

    /// Sign with a different HMAC key
    pub fn signed_with(mut self, key: &[u8]) -> Self {
        self.key = key.to_vec();
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value
    pub fn build(&self) -> serde_json::Value {
        let mut claims = json!({
            "sub": self.sub,
            "iss": self.iss,
            "aud": self.aud,
            "exp": self.exp,
            "iat": self.iat,
        });
        if let Some(map) = claims.as_object_mut() {
            for claim in &self.omitted {
                map.remove(claim);
            }
        }
        claims
    }

    /// Build and sign the token
    ///
    /// # Panics
    ///
    /// Panics if the algorithm is not an HMAC variant.
    pub fn sign(self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.build(),
            &EncodingKey::from_secret(&self.key),
        )
        .expect("test token signing should succeed")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
