//! Authentication primitives.
//!
//! - [`jwt`] -- bearer-token claims, signing and verification.

pub mod jwt;
