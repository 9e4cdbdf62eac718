//! User entity model and DTOs.

use rewear_core::catalog::Role;
use rewear_core::naming::avatar_url;
use rewear_core::types::{DbId, Points, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserProfile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub points: Points,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub avatar_seed: Option<String>,
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub points: Points,
    pub role: Role,
    pub location: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_seed.as_deref().map(avatar_url),
            points: user.points,
            role: user.role,
            location: user.location.clone(),
        }
    }
}

/// Name and email of another user, joined into item and swap views.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// DTO for creating a new user.
///
/// There is no `points` field; every account starts at the column default.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub location: Option<String>,
    pub avatar_seed: Option<String>,
}
