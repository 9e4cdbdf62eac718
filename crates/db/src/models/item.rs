//! Item entity model, joined projections, and listing filters.

use rewear_core::catalog::{
    ApprovalStatus, CategoryName, Condition, ItemStatus, ItemType, Size, SwapPreference,
};
use rewear_core::swap::ItemSnapshot;
use rewear_core::types::{DbId, Points, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::category::CategorySummary;
use crate::models::user::UserSummary;

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category_id: DbId,
    #[sqlx(try_from = "String")]
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[sqlx(try_from = "String")]
    pub size: Size,
    #[sqlx(try_from = "String")]
    pub condition: Condition,
    pub image_key: String,
    #[sqlx(try_from = "String")]
    pub status: ItemStatus,
    #[sqlx(try_from = "String")]
    pub approval_status: ApprovalStatus,
    pub points_required: Points,
    pub uploader_id: DbId,
    #[sqlx(try_from = "String")]
    pub swap_preference: SwapPreference,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    pub fn snapshot(&self) -> ItemSnapshot {
        ItemSnapshot {
            id: self.id,
            uploader_id: self.uploader_id,
            status: self.status,
            approval_status: self.approval_status,
        }
    }
}

/// An item joined with its category and uploader summaries.
#[derive(Debug, Clone, FromRow)]
pub struct ItemWithRelations {
    #[sqlx(flatten)]
    pub item: Item,
    #[sqlx(try_from = "String")]
    pub category_name: CategoryName,
    pub category_description: Option<String>,
    pub uploader_name: String,
    pub uploader_email: String,
}

impl ItemWithRelations {
    pub fn category(&self) -> CategorySummary {
        CategorySummary {
            id: self.item.category_id,
            name: self.category_name,
            description: self.category_description.clone(),
        }
    }

    pub fn uploader(&self) -> UserSummary {
        UserSummary {
            id: self.item.uploader_id,
            name: self.uploader_name.clone(),
            email: self.uploader_email.clone(),
        }
    }
}

/// DTO for creating a new item. Status and approval take column defaults.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub title: String,
    pub description: String,
    pub category_id: DbId,
    pub item_type: ItemType,
    pub size: Size,
    pub condition: Condition,
    pub image_key: String,
    pub points_required: Points,
    pub uploader_id: DbId,
    pub swap_preference: SwapPreference,
}

/// Sortable listing columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
    PointsRequired,
}

impl ItemSortField {
    /// Map a client-facing `sortBy` value; unknown names fall back to
    /// creation time.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("updatedAt") => Self::UpdatedAt,
            Some("title") => Self::Title,
            Some("pointsRequired") => Self::PointsRequired,
            _ => Self::CreatedAt,
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::CreatedAt => "i.created_at",
            Self::UpdatedAt => "i.updated_at",
            Self::Title => "i.title",
            Self::PointsRequired => "i.points_required",
        }
    }
}

/// Filters applied to item listings.
#[derive(Debug, Clone)]
pub struct ItemFilter {
    pub status: ItemStatus,
    /// Set membership; must not be empty.
    pub approval_statuses: Vec<ApprovalStatus>,
    pub uploader_id: Option<DbId>,
    pub category_id: Option<DbId>,
    /// Leave this item out (the "past listings" view excludes the item itself).
    pub exclude_id: Option<DbId>,
    pub sort_by: ItemSortField,
    pub descending: bool,
}

impl ItemFilter {
    /// The public browsing filter: available, approved, oldest first.
    pub fn listable() -> Self {
        Self {
            status: ItemStatus::Available,
            approval_statuses: vec![ApprovalStatus::Approved],
            uploader_id: None,
            category_id: None,
            exclude_id: None,
            sort_by: ItemSortField::CreatedAt,
            descending: false,
        }
    }

    /// Other listable items by the same uploader, newest first.
    pub fn past_listings(uploader_id: DbId, exclude_id: DbId) -> Self {
        Self {
            uploader_id: Some(uploader_id),
            exclude_id: Some(exclude_id),
            descending: true,
            ..Self::listable()
        }
    }
}
