//! JWT utilities shared across Gatekeeper crates.
//!
//! This module provides the transport-level pieces of bearer token handling
//! that do not depend on any key material:
//! - Size limit applied before any parsing
//! - `Bearer ` prefix handling for `Authorization` header values
//! - Header inspection (`alg`) without verifying the signature
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Header inspection never implies trust; the token MUST still be verified
//! - Error messages are generic to prevent information leakage
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::{extract_alg, strip_bearer};
//!
//! let token = strip_bearer(header_value);
//! let alg = extract_alg(token)?;
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// JWTs larger than this size are rejected BEFORE any parsing or cryptographic
/// operations.
///
/// # Rationale
///
/// - Typical HS256 tokens with the standard claim set are 200-300 bytes
/// - 8KB allows for reasonable expansion while preventing abuse
/// - Checked BEFORE base64 decode and signature verification
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

/// Authorization scheme prefix stripped from credential headers.
pub const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while inspecting a JWT before verification.
///
/// Note: Error messages are intentionally generic to prevent information leakage.
/// Detailed information is logged at debug level for troubleshooting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid or expired")]
    TokenTooLarge,

    /// Token format is invalid (not a valid JWT structure).
    #[error("The access token is invalid or expired")]
    MalformedToken,

    /// Token header has no usable `alg` field.
    #[error("The access token is invalid or expired")]
    MissingAlgorithm,
}

// =============================================================================
// Functions
// =============================================================================

/// Strip a leading `Bearer ` scheme from a credential string.
///
/// Credentials without the prefix are returned unchanged, so a bare token and
/// `Bearer <token>` resolve to the same value. The match is case-sensitive and
/// only a single prefix is removed.
#[must_use]
pub fn strip_bearer(credential: &str) -> &str {
    credential.strip_prefix(BEARER_PREFIX).unwrap_or(credential)
}

/// Extract the `alg` field from a JWT header without verifying the signature.
///
/// Used to reject tokens signed with an unexpected algorithm before handing
/// them to the verifier, and to log what was presented.
///
/// # Security
///
/// - Token size is checked BEFORE any parsing (denial-of-service prevention)
/// - This function does NOT validate the token signature
///
/// # Errors
///
/// Returns `JwtValidationError` variants:
/// - `TokenTooLarge` - Token exceeds size limit
/// - `MalformedToken` - Wrong segment count, bad base64, or invalid JSON header
/// - `MissingAlgorithm` - Header `alg` missing, empty, or not a string
pub fn extract_alg(token: &str) -> Result<String, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    // JWT format: header.payload.signature
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let header_part = parts.first().ok_or(JwtValidationError::MalformedToken)?;
    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
        JwtValidationError::MalformedToken
    })?;

    header
        .get("alg")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(JwtValidationError::MissingAlgorithm)
}
