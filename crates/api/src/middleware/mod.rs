//! Request extractors and response middleware.
//!
//! - [`auth::AuthUser`] -- Resolves the session token to the caller's user row.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`error_detail::attach_error_detail`] -- Exposes internal error causes
//!   outside production.

pub mod auth;
pub mod error_detail;
pub mod rbac;
