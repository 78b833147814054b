//! Token minting handler.
//!
//! Authenticating the caller is outside Gatekeeper's scope. This route mints
//! for the configured login subject and performs no credential check.

use crate::errors::GkError;
use crate::models::TokenResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /login
///
/// ## Response
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
///   "token_type": "Bearer",
///   "expires_in": 3600
/// }
/// ```
#[instrument(skip_all, name = "gk.handlers.login")]
pub async fn login(State(state): State<Arc<AppState>>) -> Result<Json<TokenResponse>, GkError> {
    let issued = state.issuer.issue(&state.config.login_subject)?;

    tracing::info!(target: "gk.handlers.login", expires_in = issued.expires_in, "Token minted");

    Ok(Json(TokenResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_in: issued.expires_in,
    }))
}
