//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session token generation and validation.
//! - [`cookie`] -- the `token` cookie carrying the session token.

pub mod cookie;
pub mod jwt;
pub mod password;
