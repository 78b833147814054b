//! Response models for Gatekeeper endpoints.

use serde::{Deserialize, Serialize};

/// Plain informational response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for `GET /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed bearer token.
    pub token: String,

    /// Always `"Bearer"`.
    pub token_type: String,

    /// Seconds until the token expires.
    pub expires_in: u64,
}

/// Response for `GET /protected`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,

    /// Principal taken from the verified token.
    pub subject: String,
}
