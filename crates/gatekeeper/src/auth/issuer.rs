//! Token minting.
//!
//! The issuer trusts that the caller already authenticated the principal by
//! some other means. It performs no credential check of its own.

use crate::auth::claims::{Audience, Claims};
use crate::auth::signing::SigningConfig;
use crate::errors::GkError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tracing::instrument;

/// A freshly minted token and its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact-serialized JWS (`header.claims.signature`).
    pub token: String,

    /// Seconds until the token expires.
    pub expires_in: u64,
}

/// Mints HS256 tokens under a shared `SigningConfig`.
pub struct TokenIssuer {
    config: Arc<SigningConfig>,
    encoding_key: EncodingKey,
}

/// Whether `subject` can be placed in a token: non-empty, no control characters.
pub fn is_well_formed_subject(subject: &str) -> bool {
    !subject.is_empty() && !subject.chars().any(char::is_control)
}

impl TokenIssuer {
    pub fn new(config: Arc<SigningConfig>) -> Self {
        let encoding_key = EncodingKey::from_secret(config.key());
        Self {
            config,
            encoding_key,
        }
    }

    /// Mint a token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    ///
    /// - `GkError::BadRequest` - subject is empty or contains control characters
    /// - `GkError::Signing` - key material unavailable or the encoder failed
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, GkError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Mint a token as if the current time were `now` (Unix seconds).
    #[instrument(skip_all, name = "gk.auth.issue")]
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<IssuedToken, GkError> {
        if !is_well_formed_subject(subject) {
            return Err(GkError::BadRequest(
                "subject must be non-empty and free of control characters".to_string(),
            ));
        }

        if self.config.key().is_empty() {
            return Err(GkError::Signing("signing key unavailable".to_string()));
        }

        let aud = self
            .config
            .primary_audience()
            .ok_or_else(|| GkError::Signing("no audience configured".to_string()))?;

        let expires_in = self.config.lifetime().as_secs();
        let exp = i64::try_from(expires_in)
            .ok()
            .and_then(|lifetime| now.checked_add(lifetime))
            .ok_or_else(|| GkError::Signing("token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: Some(now),
            exp,
            iss: self.config.issuer().to_string(),
            aud: Audience::from(aud),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GkError::Signing(format!("JWT signing operation failed: {}", e)))?;

        tracing::debug!(target: "gk.auth.issuer", exp = claims.exp, "Token issued");

        Ok(IssuedToken { token, expires_in })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use std::time::Duration;

    const NOW: i64 = 1_700_000_000;

    fn issuer_with(key: &[u8], audiences: Vec<String>) -> TokenIssuer {
        TokenIssuer::new(Arc::new(SigningConfig::new(
            key,
            "my-app".to_string(),
            audiences,
            Duration::from_secs(3600),
        )))
    }

    fn issuer() -> TokenIssuer {
        issuer_with(b"supersecret", vec!["my-audience".to_string()])
    }

    fn decode_segment(token: &str, index: usize) -> serde_json::Value {
        let segment = token.split('.').nth(index).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[test]
    fn test_issue_at_writes_expected_claims() {
        let issued = issuer().issue_at("kunal", NOW).unwrap();
        let claims = decode_segment(&issued.token, 1);

        assert_eq!(claims["sub"], "kunal");
        assert_eq!(claims["iat"], NOW);
        assert_eq!(claims["exp"], NOW + 3600);
        assert_eq!(claims["iss"], "my-app");
        assert_eq!(claims["aud"], "my-audience");
        assert_eq!(issued.expires_in, 3600);
    }

    #[test]
    fn test_issue_at_uses_hs256_header() {
        let issued = issuer().issue_at("kunal", NOW).unwrap();
        let header = decode_segment(&issued.token, 0);

        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");
    }

    #[test]
    fn test_token_has_three_segments() {
        let issued = issuer().issue_at("kunal", NOW).unwrap();
        assert_eq!(issued.token.split('.').count(), 3);
    }

    #[test]
    fn test_same_instant_is_deterministic() {
        let issuer = issuer();
        let a = issuer.issue_at("kunal", NOW).unwrap();
        let b = issuer.issue_at("kunal", NOW).unwrap();
        assert_eq!(a.token, b.token);
    }

    #[test]
    fn test_different_instants_produce_different_signatures() {
        let issuer = issuer();
        let a = issuer.issue_at("kunal", NOW).unwrap();
        let b = issuer.issue_at("kunal", NOW + 1).unwrap();

        let sig_a = a.token.rsplit('.').next().unwrap();
        let sig_b = b.token.rsplit('.').next().unwrap();
        assert_ne!(sig_a, sig_b);
    }

    #[test]
    fn test_primary_audience_is_written() {
        let issuer = issuer_with(
            b"supersecret",
            vec!["first".to_string(), "second".to_string()],
        );
        let issued = issuer.issue_at("kunal", NOW).unwrap();
        assert_eq!(decode_segment(&issued.token, 1)["aud"], "first");
    }

    #[test]
    fn test_rejects_empty_subject() {
        let result = issuer().issue_at("", NOW);
        assert!(matches!(result, Err(GkError::BadRequest(_))));
    }

    #[test]
    fn test_rejects_control_characters_in_subject() {
        let result = issuer().issue_at("ali\u{0}ce", NOW);
        assert!(matches!(result, Err(GkError::BadRequest(_))));
    }

    #[test]
    fn test_empty_key_is_signing_error() {
        let result = issuer_with(b"", vec!["my-audience".to_string()]).issue_at("kunal", NOW);
        assert!(matches!(result, Err(GkError::Signing(msg)) if msg.contains("key unavailable")));
    }

    #[test]
    fn test_missing_audience_is_signing_error() {
        let result = issuer_with(b"supersecret", Vec::new()).issue_at("kunal", NOW);
        assert!(matches!(result, Err(GkError::Signing(_))));
    }

    #[test]
    fn test_expiry_overflow_is_signing_error() {
        let result = issuer().issue_at("kunal", i64::MAX);
        assert!(matches!(result, Err(GkError::Signing(_))));
    }

    #[test]
    fn test_issue_uses_current_time() {
        let before = Utc::now().timestamp();
        let issued = issuer().issue("kunal").unwrap();
        let after = Utc::now().timestamp();

        let iat = decode_segment(&issued.token, 1)["iat"].as_i64().unwrap();
        assert!(iat >= before && iat <= after);
    }

    #[test]
    fn test_well_formed_subject() {
        assert!(is_well_formed_subject("kunal"));
        assert!(is_well_formed_subject("user@example.com"));
        assert!(is_well_formed_subject("名前"));
        assert!(!is_well_formed_subject(""));
        assert!(!is_well_formed_subject("tab\there"));
    }
}
