//! Secret types for protecting sensitive values from accidental logging.
//!
//! This module re-exports types from the [`secrecy`] crate. Use these types for
//! signing keys and any other credential material handled by Gatekeeper.
//!
//! Both `SecretString` and `SecretBox<T>` print `[REDACTED]` under `Debug`, so
//! a config or state struct that derives `Debug` stays safe to log. The inner
//! value is zeroized on drop and can only be read through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use common::secret::SecretString;
//! use secrecy::ExposeSecret;
//!
//! #[derive(Debug)]
//! struct KeyMaterial {
//!     issuer: String,
//!     signing_key: SecretString,  // Safe: Debug shows "[REDACTED]"
//! }
//!
//! let material = KeyMaterial {
//!     issuer: "my-app".to_string(),
//!     signing_key: SecretString::from("supersecret"),
//! };
//!
//! // Safe: the key is redacted
//! println!("{:?}", material);
//!
//! // Reading the key requires an explicit call
//! let key: &[u8] = material.signing_key.expose_secret().as_bytes();
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - HMAC signing keys loaded from the environment
//! - Bearer tokens held outside of a request
//!
//! Use `SecretBox<T>` for:
//! - Custom secret types (e.g., `SecretBox<[u8]>` for binary keys)

// Re-export the main types from secrecy
pub use secrecy::{ExposeSecret, SecretBox, SecretString};
