//! Token verification gate.
//!
//! Decides, per protected request, whether the presented credential is a
//! currently valid token minted under the same `SigningConfig`.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Only HS256 is accepted; any other header `alg` is rejected up front
//! - `sub`, `exp`, `iss`, `aud` are all required
//! - Expiry is exclusive and has no leeway
//! - Generic error messages prevent information leakage; the detail carried
//!   by `GkError::InvalidToken` is only ever logged

use crate::auth::claims::Claims;
use crate::auth::signing::SigningConfig;
use crate::errors::GkError;
use chrono::Utc;
use common::jwt::{extract_alg, strip_bearer};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Reasons a gate cannot be bound to a signing configuration.
///
/// These are operator errors. Startup must abort rather than serve protected
/// routes without a working gate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateInitError {
    #[error("signing key is empty")]
    EmptyKey,

    #[error("issuer is empty")]
    EmptyIssuer,

    #[error("audience set is empty")]
    NoAudience,

    #[error("audience set contains an empty entry")]
    EmptyAudience,
}

/// Verifier bound once to a `SigningConfig`.
///
/// Holds no mutable state; share it across requests behind an `Arc`.
pub struct TokenGate {
    config: Arc<SigningConfig>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenGate {
    /// Bind a verifier to `config`.
    ///
    /// # Errors
    ///
    /// Returns `GateInitError` if the key or issuer is empty, or the audience
    /// set is empty or contains an empty entry.
    pub fn new(config: Arc<SigningConfig>) -> Result<Self, GateInitError> {
        if config.key().is_empty() {
            return Err(GateInitError::EmptyKey);
        }
        if config.issuer().trim().is_empty() {
            return Err(GateInitError::EmptyIssuer);
        }
        if config.audiences().is_empty() {
            return Err(GateInitError::NoAudience);
        }
        if config.audiences().iter().any(|aud| aud.trim().is_empty()) {
            return Err(GateInitError::EmptyAudience);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(config.audiences());
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);
        // exp is compared against the caller's clock in verify_at
        validation.validate_exp = false;
        validation.leeway = 0;

        let decoding_key = DecodingKey::from_secret(config.key());

        tracing::info!(
            target: "gk.auth.gate",
            issuer = %config.issuer(),
            audiences = config.audiences().len(),
            "Token gate initialized"
        );

        Ok(Self {
            config,
            decoding_key,
            validation,
        })
    }

    /// The configuration this gate was bound to.
    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Verify `token` against the current wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns `GkError::InvalidToken` for every verification failure.
    pub fn verify(&self, token: &str) -> Result<Claims, GkError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as if the current time were `now` (Unix seconds).
    ///
    /// # Security Checks
    ///
    /// 1. Size and structure check, header `alg` must be HS256
    /// 2. HMAC signature against the shared key
    /// 3. Required claims present, `iss` and `aud` match configuration
    /// 4. `exp` strictly after `now`
    #[instrument(skip_all, name = "gk.auth.verify")]
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, GkError> {
        let alg = extract_alg(token).map_err(|e| {
            tracing::debug!(target: "gk.auth.gate", error = ?e, "Token header inspection failed");
            GkError::InvalidToken(format!("malformed token: {:?}", e))
        })?;

        if alg != "HS256" {
            tracing::debug!(target: "gk.auth.gate", alg = %alg, "Unexpected token algorithm");
            return Err(GkError::InvalidToken(format!(
                "unexpected algorithm: {}",
                alg
            )));
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!(target: "gk.auth.gate", error = %e, "Token verification failed");
                GkError::InvalidToken(format!("{:?}", e.kind()))
            })?;

        let claims = token_data.claims;

        if !self
            .config
            .audiences()
            .iter()
            .any(|aud| claims.aud.contains(aud))
        {
            tracing::debug!(target: "gk.auth.gate", "Token rejected: no accepted audience");
            return Err(GkError::InvalidToken("no accepted audience".to_string()));
        }

        if !claims.is_live_at(now) {
            tracing::debug!(
                target: "gk.auth.gate",
                exp = claims.exp,
                now = now,
                "Token rejected: expired"
            );
            return Err(GkError::InvalidToken("token expired".to_string()));
        }

        tracing::debug!(target: "gk.auth.gate", "Token validated successfully");
        Ok(claims)
    }
}

/// Run the full per-request decision procedure.
///
/// Checks, in order, with the first failure winning:
///
/// 1. A credential is present and non-empty after stripping `Bearer `
///    (`MissingCredential`)
/// 2. A gate is bound (`GateNotReady`)
/// 3. The token verifies under the gate (`InvalidToken`)
pub fn authorize(
    gate: Option<&TokenGate>,
    credential: Option<&str>,
    now: i64,
) -> Result<Claims, GkError> {
    let token = credential
        .map(strip_bearer)
        .filter(|token| !token.is_empty())
        .ok_or(GkError::MissingCredential)?;

    let gate = gate.ok_or(GkError::GateNotReady)?;

    gate.verify_at(token, now)
}
