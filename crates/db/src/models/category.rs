//! Category entity model.

use rewear_core::catalog::CategoryName;
use rewear_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table. Seeded by migration.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub name: CategoryName,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Name and description of an item's category, joined into item views.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub id: DbId,
    pub name: CategoryName,
    pub description: Option<String>,
}
