//! JWT claims structure.
//!
//! The same struct is serialized by the issuer and deserialized by the gate.
//! The `sub` field is redacted in Debug output to prevent exposure in logs.
//!
//! `iat` is optional and `aud` may be a string or an array on the way in.
//! Tokens minted here always carry `iat` and a single string `aud`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Claims carried by every Gatekeeper token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal identifier) - redacted in Debug output.
    pub sub: String,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issuing authority.
    pub iss: String,

    /// Intended consumer(s).
    pub aud: Audience,
}

/// The `aud` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is named by this claim.
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

impl From<&str> for Audience {
    fn from(audience: &str) -> Self {
        Audience::One(audience.to_string())
    }
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("iss", &self.iss)
            .field("aud", &self.aud)
            .finish()
    }
}

impl Claims {
    /// Whether the token is still valid at `now`. Expiry is exclusive.
    pub fn is_live_at(&self, now: i64) -> bool {
        self.exp > now
    }

    /// The verified principal.
    pub fn subject(&self) -> &str {
        &self.sub
    }
}
