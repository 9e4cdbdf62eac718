//! Repository for the `items` table.

use rewear_core::catalog::{ApprovalStatus, ItemStatus};
use rewear_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item, ItemFilter, ItemWithRelations};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, title, description, category_id, item_type, size, condition, \
                        image_key, status, approval_status, points_required, uploader_id, \
                        swap_preference, created_at, updated_at";

/// Item columns qualified with the `i` alias plus joined category and
/// uploader fields, for [`ItemWithRelations`].
const JOINED_COLUMNS: &str = "i.id, i.title, i.description, i.category_id, i.item_type, \
                               i.size, i.condition, i.image_key, i.status, i.approval_status, \
                               i.points_required, i.uploader_id, i.swap_preference, \
                               i.created_at, i.updated_at, \
                               c.name AS category_name, c.description AS category_description, \
                               u.name AS uploader_name, u.email AS uploader_email";

const JOINS: &str = "FROM items i \
                     JOIN categories c ON c.id = i.category_id \
                     JOIN users u ON u.id = i.uploader_id";

/// Shared `WHERE` clause for [`ItemFilter`]; binds `$1..=$5`.
const FILTER_CLAUSE: &str = "WHERE i.status = $1 \
                               AND i.approval_status = ANY($2) \
                               AND ($3::BIGINT IS NULL OR i.uploader_id = $3) \
                               AND ($4::BIGINT IS NULL OR i.category_id = $4) \
                               AND ($5::BIGINT IS NULL OR i.id <> $5)";

/// Provides item creation, lookup, listing, and moderation.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item, returning the created row.
    ///
    /// `status` and `approval_status` take their column defaults
    /// (`available` / `pending`).
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (title, description, category_id, item_type, size, condition,
                 image_key, points_required, uploader_id, swap_preference)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.category_id)
            .bind(input.item_type.as_str())
            .bind(input.size.as_str())
            .bind(input.condition.as_str())
            .bind(&input.image_key)
            .bind(input.points_required)
            .bind(input.uploader_id)
            .bind(input.swap_preference.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find an item by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item with its category and uploader joined in.
    pub async fn find_with_relations(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ItemWithRelations>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} {JOINS} WHERE i.id = $1");
        sqlx::query_as::<_, ItemWithRelations>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of items matching `filter`.
    ///
    /// Ties on the sort column are broken by id in the same direction so
    /// pages never overlap.
    pub async fn list(
        pool: &PgPool,
        filter: &ItemFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItemWithRelations>, sqlx::Error> {
        let direction = if filter.descending { "DESC" } else { "ASC" };
        let sort_column = filter.sort_by.column();
        let query = format!(
            "SELECT {JOINED_COLUMNS} {JOINS} {FILTER_CLAUSE} \
             ORDER BY {sort_column} {direction}, i.id {direction} \
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, ItemWithRelations>(&query)
            .bind(filter.status.as_str())
            .bind(approval_texts(&filter.approval_statuses))
            .bind(filter.uploader_id)
            .bind(filter.category_id)
            .bind(filter.exclude_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count all items matching `filter`, ignoring pagination.
    pub async fn count(pool: &PgPool, filter: &ItemFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM items i {FILTER_CLAUSE}");
        let row: (i64,) = sqlx::query_as(&query)
            .bind(filter.status.as_str())
            .bind(approval_texts(&filter.approval_statuses))
            .bind(filter.uploader_id)
            .bind(filter.category_id)
            .bind(filter.exclude_id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Set an item's moderation state.
    ///
    /// Swapped items are immutable: returns `None` when the item does not
    /// exist or has already been swapped.
    pub async fn set_approval_status(
        pool: &PgPool,
        id: DbId,
        approval_status: ApprovalStatus,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET approval_status = $2 \
             WHERE id = $1 AND status <> $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(approval_status.as_str())
            .bind(ItemStatus::Swapped.as_str())
            .fetch_optional(pool)
            .await
    }
}

fn approval_texts(statuses: &[ApprovalStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}
