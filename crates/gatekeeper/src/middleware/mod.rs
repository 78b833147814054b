//! Middleware for Gatekeeper.
//!
//! # Components
//!
//! - `auth` - Token gate in front of protected routes

pub mod auth;

pub use auth::{require_auth, AuthState, ClaimsExt};
