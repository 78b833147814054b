//! HTTP routes for Gatekeeper.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::handlers;
use crate::middleware::{require_auth, AuthState};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token issuer bound to the shared signing configuration.
    pub issuer: Arc<TokenIssuer>,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Public welcome message
/// - `/login` - Mints a token for the configured login subject
/// - `/protected` - Requires a valid bearer token
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, auth_state: Arc<AuthState>) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/", get(handlers::home))
        .route("/login", get(handlers::login))
        .with_state(state);

    // Protected routes (token gate runs before the handler)
    let protected_routes = Router::new()
        .route("/protected", get(handlers::get_protected))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    // Apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::TokenGate;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tower::ServiceExt;

    fn app(bound: bool) -> Router {
        let vars = HashMap::from([("JWT_SIGNING_KEY".to_string(), "supersecret".to_string())]);
        let config = Config::from_vars(&vars).unwrap();
        let signing = Arc::new(config.signing_config());

        let auth_state = if bound {
            AuthState::new(Arc::new(TokenGate::new(Arc::clone(&signing)).unwrap()))
        } else {
            AuthState::unbound()
        };

        let state = Arc::new(AppState {
            config,
            issuer: Arc::new(TokenIssuer::new(signing)),
        });

        build_routes(state, Arc::new(auth_state))
    }

    async fn send(app: Router, uri: &str, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = authorization {
            builder = builder.header("authorization", value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_state_is_clone() {
        // AppState must be Clone for Axum's State extractor.
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_home_is_public() {
        let (status, body) = send(app(true), "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to the Gatekeeper API");
    }

    #[tokio::test]
    async fn test_login_then_protected() {
        let (status, body) = send(app(true), "/login", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["token_type"], "Bearer");
        assert_eq!(body["expires_in"], 3600);

        let token = body["token"].as_str().unwrap().to_string();
        let (status, body) = send(
            app(true),
            "/protected",
            Some(&format!("Bearer {}", token)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "kunal");
    }

    #[tokio::test]
    async fn test_protected_without_token() {
        let (status, body) = send(app(true), "/protected", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_unbound_gate_does_not_affect_public_routes() {
        let (status, _) = send(app(false), "/login", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app(false), "/protected", Some("Bearer a.b.c")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "GATE_NOT_READY");
    }
}
