//! Gatekeeper Service Library
//!
//! Issues and verifies HS256-signed bearer tokens and gates protected HTTP
//! routes on them.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs (gate) -> handlers/*.rs
//!                                  \-> auth/gate.rs
//! handlers/login.rs -> auth/issuer.rs
//! ```
//!
//! Both `auth::TokenIssuer` and `auth::TokenGate` are built from one
//! `auth::SigningConfig`, so tokens minted by one always verify under the other.
//!
//! # Modules
//!
//! - `auth` - Signing configuration, claims, issuer, gate
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Token gate middleware
//! - `models` - Response models
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
