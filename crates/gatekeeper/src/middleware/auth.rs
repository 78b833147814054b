//! Authentication middleware for protected routes.
//!
//! Reads the `Authorization` header, runs the token gate, and either
//! short-circuits with a rejection or stores the verified `Claims` in the
//! request extensions for the handler.

use crate::auth::{authorize, Claims, TokenGate};
use crate::errors::GkError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use chrono::Utc;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Bound verifier. `None` means the gate was never initialized, which is
    /// reported as a server-side failure rather than a client rejection.
    pub gate: Option<Arc<TokenGate>>,
}

impl AuthState {
    pub fn new(gate: Arc<TokenGate>) -> Self {
        Self { gate: Some(gate) }
    }

    /// State with no bound verifier.
    pub fn unbound() -> Self {
        Self { gate: None }
    }
}

/// Read the raw `Authorization` header value.
///
/// Non-ASCII bytes are decoded lossily so the value still reaches the
/// verifier and fails there.
fn credential_header(req: &Request) -> Option<Cow<'_, str>> {
    req.headers()
        .get("authorization")
        .map(|h| String::from_utf8_lossy(h.as_bytes()))
}

/// Authentication middleware.
///
/// # Response
///
/// - 401 Unauthorized if the credential is missing, invalid, or expired
/// - 500 Internal Server Error if no gate is bound
/// - Continues to next handler with `Claims` in extensions otherwise
#[instrument(skip_all, name = "gk.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, GkError> {
    let claims = {
        let credential = credential_header(&req);
        if credential.is_none() {
            tracing::debug!(target: "gk.middleware.auth", "Missing Authorization header");
        }

        authorize(
            state.gate.as_deref(),
            credential.as_deref(),
            Utc::now().timestamp(),
        )?
    };

    // Store claims in request extensions for downstream handlers
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extension trait for extracting claims from request.
pub trait ClaimsExt {
    /// Get the authenticated claims from request extensions.
    ///
    /// Returns `None` if auth middleware was not applied to this request.
    fn claims(&self) -> Option<&Claims>;
}

impl<B> ClaimsExt for axum::extract::Request<B> {
    fn claims(&self) -> Option<&Claims> {
        self.extensions().get::<Claims>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::{SigningConfig, TokenIssuer};
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use std::time::Duration;
    use tower::ServiceExt;

    async fn echo_subject(req: Request) -> String {
        req.claims()
            .map(|claims| claims.sub.clone())
            .unwrap_or_default()
    }

    fn app(state: AuthState) -> Router {
        Router::new().route("/protected", get(echo_subject)).layer(
            middleware::from_fn_with_state(Arc::new(state), require_auth),
        )
    }

    fn issuer_and_gate() -> (TokenIssuer, Arc<TokenGate>) {
        let config = Arc::new(SigningConfig::new(
            b"supersecret",
            "my-app".to_string(),
            vec!["my-audience".to_string()],
            Duration::from_secs(3600),
        ));
        (
            TokenIssuer::new(Arc::clone(&config)),
            Arc::new(TokenGate::new(config).unwrap()),
        )
    }

    fn request(authorization: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/protected");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        use http_body_util::BodyExt;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_auth_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AuthState>();
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let (issuer, gate) = issuer_and_gate();
        let token = issuer.issue("kunal").unwrap().token;

        let response = app(AuthState::new(gate))
            .oneshot(request(Some(&format!("Bearer {}", token))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "kunal");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (_, gate) = issuer_and_gate();

        let response = app(AuthState::new(gate))
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("MISSING_TOKEN"));
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (_, gate) = issuer_and_gate();

        let response = app(AuthState::new(gate))
            .oneshot(request(Some("Bearer not.a.token")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("INVALID_TOKEN"));
    }

    #[tokio::test]
    async fn test_non_ascii_header_is_invalid_not_missing() {
        let (_, gate) = issuer_and_gate();

        let mut req = request(None);
        req.headers_mut().insert(
            AUTHORIZATION,
            axum::http::HeaderValue::from_bytes(b"Bearer \xffabc.def.ghi").unwrap(),
        );

        let response = app(AuthState::new(gate)).oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.contains("INVALID_TOKEN"));
    }

    #[tokio::test]
    async fn test_unbound_gate_is_server_error() {
        let response = app(AuthState::unbound())
            .oneshot(request(Some("Bearer a.b.c")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_unbound_gate_still_reports_missing_credential_first() {
        let response = app(AuthState::unbound())
            .oneshot(request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
