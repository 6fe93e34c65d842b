//! Authentication primitives.
//!
//! Access tokens are minted by the identity provider flow; this server only
//! validates them.
//!
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
