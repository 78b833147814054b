//! Gatekeeper configuration.
//!
//! Configuration is loaded from environment variables once at startup. The
//! signing key is held as a `SecretString` and is redacted in Debug output.

use crate::auth::{is_well_formed_subject, SigningConfig};
use common::secret::SecretString;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "my-app";

/// Default token audience.
pub const DEFAULT_AUDIENCE: &str = "my-audience";

/// Default token lifetime in seconds (1 hour).
pub const DEFAULT_TOKEN_LIFETIME_SECONDS: u64 = 3600;

/// Maximum token lifetime in seconds (24 hours).
pub const MAX_TOKEN_LIFETIME_SECONDS: u64 = 86_400;

/// Default principal that `/login` mints tokens for.
pub const DEFAULT_LOGIN_SUBJECT: &str = "kunal";

/// Gatekeeper configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Shared HMAC key used to sign and verify tokens.
    pub jwt_signing_key: SecretString,

    /// Issuer written into and required on every token.
    pub jwt_issuer: String,

    /// Accepted audiences. The first entry is written into minted tokens.
    pub jwt_audiences: Vec<String>,

    /// Token lifetime in seconds.
    pub token_lifetime_seconds: u64,

    /// Principal that `/login` mints tokens for.
    pub login_subject: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid signing key configuration: {0}")]
    InvalidSigningKey(String),

    #[error("Invalid issuer configuration: {0}")]
    InvalidIssuer(String),

    #[error("Invalid audience configuration: {0}")]
    InvalidAudience(String),

    #[error("Invalid token lifetime configuration: {0}")]
    InvalidTokenLifetime(String),

    #[error("Invalid login subject configuration: {0}")]
    InvalidLoginSubject(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_signing_key = vars
            .get("JWT_SIGNING_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SIGNING_KEY".to_string()))?;
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::InvalidSigningKey(
                "JWT_SIGNING_KEY must not be empty".to_string(),
            ));
        }
        let jwt_signing_key = SecretString::from(jwt_signing_key.as_str());

        let jwt_issuer = vars
            .get("JWT_ISSUER")
            .cloned()
            .unwrap_or_else(|| DEFAULT_ISSUER.to_string());
        if jwt_issuer.trim().is_empty() {
            return Err(ConfigError::InvalidIssuer(
                "JWT_ISSUER must not be empty".to_string(),
            ));
        }

        // Comma-separated; blank entries are dropped
        let jwt_audiences: Vec<String> = vars
            .get("JWT_AUDIENCE")
            .map(String::as_str)
            .unwrap_or(DEFAULT_AUDIENCE)
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect();
        if jwt_audiences.is_empty() {
            return Err(ConfigError::InvalidAudience(
                "JWT_AUDIENCE must contain at least one audience".to_string(),
            ));
        }

        let token_lifetime_seconds = if let Some(value_str) = vars.get("TOKEN_LIFETIME_SECONDS")
        {
            let value: u64 = value_str.parse().map_err(|e| {
                ConfigError::InvalidTokenLifetime(format!(
                    "TOKEN_LIFETIME_SECONDS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidTokenLifetime(
                    "TOKEN_LIFETIME_SECONDS must be greater than 0".to_string(),
                ));
            }

            if value > MAX_TOKEN_LIFETIME_SECONDS {
                return Err(ConfigError::InvalidTokenLifetime(format!(
                    "TOKEN_LIFETIME_SECONDS must not exceed {} seconds, got {}",
                    MAX_TOKEN_LIFETIME_SECONDS, value
                )));
            }

            value
        } else {
            DEFAULT_TOKEN_LIFETIME_SECONDS
        };

        let login_subject = vars
            .get("LOGIN_SUBJECT")
            .cloned()
            .unwrap_or_else(|| DEFAULT_LOGIN_SUBJECT.to_string());
        if !is_well_formed_subject(&login_subject) {
            return Err(ConfigError::InvalidLoginSubject(
                "LOGIN_SUBJECT must be non-empty and free of control characters".to_string(),
            ));
        }

        Ok(Config {
            bind_address,
            jwt_signing_key,
            jwt_issuer,
            jwt_audiences,
            token_lifetime_seconds,
            login_subject,
        })
    }

    /// Build the signing configuration shared by the issuer and the gate.
    pub fn signing_config(&self) -> SigningConfig {
        SigningConfig::new(
            self.jwt_signing_key.expose_secret().as_bytes(),
            self.jwt_issuer.clone(),
            self.jwt_audiences.clone(),
            Duration::from_secs(self.token_lifetime_seconds),
        )
    }
}
