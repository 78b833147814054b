//! Protected route handler.
//!
//! Runs only after `require_auth` accepted the request.

use crate::auth::Claims;
use crate::models::ProtectedResponse;
use axum::{Extension, Json};
use tracing::instrument;

/// Handler for GET /protected
///
/// Returns the principal the gate verified.
#[instrument(skip_all, name = "gk.handlers.protected")]
pub async fn get_protected(Extension(claims): Extension<Claims>) -> Json<ProtectedResponse> {
    tracing::debug!(target: "gk.handlers.protected", "Access granted");

    Json(ProtectedResponse {
        message: "Access granted to protected route!".to_string(),
        subject: claims.sub,
    })
}
