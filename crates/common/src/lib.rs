//! Common utilities and types shared across Gatekeeper crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limits, bearer parsing, header inspection)
pub mod jwt;
