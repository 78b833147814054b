//! Test server harness for E2E testing
//!
//! Provides `TestGkServer` for spawning real Gatekeeper server instances in tests.

use gatekeeper::auth::{SigningConfig, TokenGate, TokenIssuer};
use gatekeeper::config::Config;
use gatekeeper::middleware::AuthState;
use gatekeeper::routes::{self, AppState};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Signing key used by every harness server unless overridden.
pub const TEST_SIGNING_KEY: &str = "test-signing-key";

/// Test harness for spawning the Gatekeeper server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_flow_e2e() -> Result<()> {
///     let server = TestGkServer::spawn().await?;
///     let client = reqwest::Client::new();
///
///     let response = client
///         .get(format!("{}/login", server.url()))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestGkServer {
    addr: SocketAddr,
    config: Config,
    signing: Arc<SigningConfig>,
    _handle: JoinHandle<()>,
}

impl TestGkServer {
    /// Spawn a server with the default test configuration.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign with `TEST_SIGNING_KEY`, issuer `my-app`, audience `my-audience`
    /// - Start the HTTP server in the background
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(HashMap::new()).await
    }

    /// Spawn a server, overriding configuration variables.
    pub async fn spawn_with_vars(overrides: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        Self::spawn_inner(overrides, true).await
    }

    /// Spawn a server whose token gate was never bound.
    pub async fn spawn_unbound() -> Result<Self, anyhow::Error> {
        Self::spawn_inner(HashMap::new(), false).await
    }

    async fn spawn_inner(
        overrides: HashMap<String, String>,
        bind_gate: bool,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("JWT_SIGNING_KEY".to_string(), TEST_SIGNING_KEY.to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let signing = Arc::new(config.signing_config());

        let auth_state = if bind_gate {
            let gate = TokenGate::new(Arc::clone(&signing))
                .map_err(|e| anyhow::anyhow!("Failed to initialize token gate: {}", e))?;
            AuthState::new(Arc::new(gate))
        } else {
            AuthState::unbound()
        };

        let state = Arc::new(AppState {
            config: config.clone(),
            issuer: Arc::new(TokenIssuer::new(Arc::clone(&signing))),
        });

        // Build routes using gatekeeper's real route builder
        let app = routes::build_routes(state, Arc::new(auth_state));

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            signing,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// An issuer sharing the server's signing configuration.
    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(Arc::clone(&self.signing))
    }
}

impl Drop for TestGkServer {
    fn drop(&mut self) {
        // Abort the HTTP server task when the test completes
        self._handle.abort();
    }
}
