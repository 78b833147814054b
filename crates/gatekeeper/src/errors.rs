//! Gatekeeper error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse` impl.
//! Error messages returned to clients are intentionally generic to avoid
//! leaking verifier internals. Actual errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Generic client-facing message for every token verification failure.
pub const INVALID_TOKEN_MESSAGE: &str = "The access token is invalid or expired";

/// Gatekeeper error type.
///
/// Maps to appropriate HTTP status codes:
/// - MissingCredential, InvalidToken: 401 Unauthorized
/// - BadRequest: 400 Bad Request
/// - Signing, GateNotReady: 500 Internal Server Error
#[derive(Debug, Error)]
pub enum GkError {
    /// Token minting failed (key material unavailable, encoder failure).
    #[error("Signing error: {0}")]
    Signing(String),

    /// No credential was presented.
    #[error("Missing credential")]
    MissingCredential,

    /// Signature or claim validation failed. The detail is for logs only.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The request reached the gate before a verifier was bound.
    #[error("Token gate not ready")]
    GateNotReady,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl GkError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GkError::Signing(_) | GkError::GateNotReady => 500,
            GkError::MissingCredential | GkError::InvalidToken(_) => 401,
            GkError::BadRequest(_) => 400,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for GkError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GkError::Signing(err) => {
                tracing::error!(target: "gk.auth", error = %err, "Token signing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SIGNING_ERROR",
                    "Error generating token".to_string(),
                )
            }
            GkError::MissingCredential => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "Missing token".to_string(),
            ),
            GkError::InvalidToken(detail) => {
                tracing::debug!(target: "gk.auth", detail = %detail, "Rejecting invalid token");
                (
                    StatusCode::UNAUTHORIZED,
                    "INVALID_TOKEN",
                    INVALID_TOKEN_MESSAGE.to_string(),
                )
            }
            GkError::GateNotReady => {
                tracing::error!(target: "gk.auth", "Protected request reached an unbound token gate");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GATE_NOT_READY",
                    "An internal error occurred".to_string(),
                )
            }
            GkError::BadRequest(reason) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", reason.clone()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"gatekeeper\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}
