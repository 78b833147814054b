//! Token lifecycle for Gatekeeper.
//!
//! Minting and verification share one `SigningConfig`, built once at startup
//! and handed to both sides by `Arc`.
//!
//! # Components
//!
//! - `signing` - Shared key material and issuer/audience identity
//! - `claims` - Claims carried inside every token
//! - `issuer` - Mints signed tokens for an already-authenticated principal
//! - `gate` - Per-request verification and the accept/reject decision

pub mod claims;
pub mod gate;
pub mod issuer;
pub mod signing;

pub use claims::{Audience, Claims};
pub use gate::{authorize, GateInitError, TokenGate};
pub use issuer::{is_well_formed_subject, IssuedToken, TokenIssuer};
pub use signing::SigningConfig;
