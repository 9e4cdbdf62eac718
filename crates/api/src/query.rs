//! Shared query parameter types for API handlers.

use rewear_core::types::DbId;
use rewear_db::models::swap::SwapParty;
use serde::{Deserialize, Deserializer};

/// Query parameters for `GET /api/items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemListParams {
    #[serde(default, deserialize_with = "lenient_number")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub limit: Option<i64>,
    /// One of `createdAt`, `updatedAt`, `title`, `pointsRequired`.
    pub sort_by: Option<String>,
    /// `desc` for descending; anything else is ascending.
    pub sort_order: Option<String>,
    pub status: Option<String>,
    /// Comma-separated set, e.g. `approved,pending`.
    pub approval_status: Option<String>,
    pub uploader: Option<DbId>,
    /// Display name, resolved to an uploader id (case-insensitive).
    pub uploader_name: Option<String>,
    pub category: Option<DbId>,
}

/// Query parameters for `GET /api/items/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetailParams {
    #[serde(default, deserialize_with = "lenient_number")]
    pub past_listings_page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub past_listings_limit: Option<i64>,
}

/// Query parameters for `GET /api/swaps`.
#[derive(Debug, Default, Deserialize)]
pub struct SwapListParams {
    #[serde(default)]
    pub role: SwapParty,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub limit: Option<i64>,
}

/// Paging numbers that fail to parse fall back to their defaults.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| v.trim().parse().ok()))
}
