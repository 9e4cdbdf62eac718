//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Any joined or summary projections the API serializes

pub mod category;
pub mod item;
pub mod swap;
pub mod user;
