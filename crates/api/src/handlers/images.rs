//! Read-side image URL resolution and the item views that carry it.
//!
//! Image URLs are derived on every read and never stored. A gateway failure
//! degrades to `imageUrl: null` for that item only.

use futures::future::join_all;
use rewear_core::storage::ObjectStore;
use rewear_db::models::category::CategorySummary;
use rewear_db::models::item::{Item, ItemWithRelations};
use rewear_db::models::user::UserSummary;
use serde::Serialize;

/// An item row plus its presigned download URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    #[serde(flatten)]
    pub item: Item,
    pub image_url: Option<String>,
}

/// A listed item with category and uploader summaries joined in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedItemView {
    #[serde(flatten)]
    pub item: Item,
    pub category: CategorySummary,
    pub uploader: UserSummary,
    pub image_url: Option<String>,
}

/// Ask the gateway for a download URL, logging and swallowing failures.
pub async fn resolve_image_url(storage: &dyn ObjectStore, image_key: &str) -> Option<String> {
    match storage.issue_download_url(image_key).await {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(image_key, error = %e, "Failed to resolve image URL");
            None
        }
    }
}

pub async fn item_view(storage: &dyn ObjectStore, item: Item) -> ItemView {
    let image_url = resolve_image_url(storage, &item.image_key).await;
    ItemView { item, image_url }
}

pub async fn listed_item_view(storage: &dyn ObjectStore, row: ItemWithRelations) -> ListedItemView {
    let image_url = resolve_image_url(storage, &row.item.image_key).await;
    ListedItemView {
        category: row.category(),
        uploader: row.uploader(),
        item: row.item,
        image_url,
    }
}

/// Resolve a page of rows concurrently, preserving order.
pub async fn listed_item_views(
    storage: &dyn ObjectStore,
    rows: Vec<ItemWithRelations>,
) -> Vec<ListedItemView> {
    join_all(rows.into_iter().map(|row| listed_item_view(storage, row))).await
}
