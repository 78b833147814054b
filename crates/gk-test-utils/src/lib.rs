//! # Gatekeeper Test Utilities
//!
//! Shared test utilities for the Gatekeeper service.
//!
//! This crate provides:
//! - Server test harness (`TestGkServer` for E2E tests)
//! - Token builder (`TestTokenBuilder` for hand-crafted tokens)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gk_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestGkServer::spawn().await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/login", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use server_harness::*;
pub use token_builders::*;
