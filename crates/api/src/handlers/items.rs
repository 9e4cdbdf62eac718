//! Handlers for item creation, browsing, and the single-item view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rewear_core::catalog::{
    parse_approval_set, Condition, ItemStatus, ItemType, Size, SwapPreference,
};
use rewear_core::error::{parse_id, CoreError};
use rewear_core::naming::{generate_image_key, IMAGE_CONTENT_TYPE};
use rewear_core::pagination::{PageRequest, DEFAULT_PAGE_LIMIT, DEFAULT_PAST_LISTINGS_LIMIT};
use rewear_core::types::{DbId, Points};
use rewear_core::validation::{
    require_fields, trimmed_within, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
use rewear_db::models::category::CategorySummary;
use rewear_db::models::item::{CreateItem, Item, ItemFilter, ItemSortField};
use rewear_db::models::user::UserSummary;
use rewear_db::repositories::{CategoryRepo, ItemRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::images::{listed_item_views, resolve_image_url, ListedItemView};
use crate::middleware::auth::AuthUser;
use crate::query::{ItemDetailParams, ItemListParams};
use crate::response::{ApiResponse, PagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /upload/item`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<DbId>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub size: Option<String>,
    pub condition: Option<String>,
    pub points_required: Option<Points>,
    pub swap_preference: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedItemResponse {
    pub item: Item,
    /// Presigned PUT the client uploads the image to.
    pub upload_url: String,
}

/// Detail view: the item plus a page of the uploader's other listings.
#[derive(Debug, Serialize)]
pub struct ItemDetailResponse {
    pub item: ItemDetail,
    pub uploader: UploaderListings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: Item,
    pub category: CategorySummary,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploaderListings {
    #[serde(flatten)]
    pub user: UserSummary,
    pub past_listings: Vec<ListedItemView>,
    pub past_listings_count: usize,
    pub past_listings_total: i64,
    pub past_listings_page: i64,
    pub past_listings_total_pages: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/upload/item
///
/// Validate the listing, reserve an upload URL, then persist the item in
/// `pending` approval. The image bytes never pass through this service.
pub async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<CreateItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedItemResponse>>)> {
    let category_text = input.category.map(|id| id.to_string());
    require_fields(&[
        ("title", input.title.as_deref()),
        ("description", input.description.as_deref()),
        ("category", category_text.as_deref()),
        ("type", input.item_type.as_deref()),
        ("size", input.size.as_deref()),
        ("condition", input.condition.as_deref()),
    ])?;

    // require_fields guarantees presence.
    let title = trimmed_within(
        "Title",
        input.title.as_deref().unwrap_or_default(),
        MAX_TITLE_LENGTH,
    )?;
    let description = trimmed_within(
        "Description",
        input.description.as_deref().unwrap_or_default(),
        MAX_DESCRIPTION_LENGTH,
    )?;
    let item_type = ItemType::parse(input.item_type.as_deref().unwrap_or_default().trim())?;
    let size = Size::parse(input.size.as_deref().unwrap_or_default().trim())?;
    let condition = Condition::parse(input.condition.as_deref().unwrap_or_default().trim())?;
    let swap_preference =
        SwapPreference::parse(input.swap_preference.as_deref().unwrap_or("both").trim())?;

    let points_required = input.points_required.unwrap_or(0);
    if points_required < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Points required cannot be negative".into(),
        )));
    }

    let category_id = input.category.unwrap_or_default();
    if CategoryRepo::find_by_id(&state.pool, category_id).await?.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid category".into(),
        )));
    }

    let image_key = generate_image_key(auth.user.id);
    let upload_url = state
        .storage
        .issue_upload_url(&image_key, IMAGE_CONTENT_TYPE)
        .await?;

    let item = ItemRepo::create(
        &state.pool,
        &CreateItem {
            title,
            description,
            category_id,
            item_type,
            size,
            condition,
            image_key,
            points_required,
            uploader_id: auth.user.id,
            swap_preference,
        },
    )
    .await?;

    tracing::info!(item_id = item.id, uploader_id = auth.user.id, "Item created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Item created successfully",
            CreatedItemResponse { item, upload_url },
        )),
    ))
}

/// GET /api/items
///
/// Public browsing. Defaults to `available` + `approved`, oldest first.
pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ItemListParams>,
) -> AppResult<Json<PagedResponse<ListedItemView>>> {
    let page = PageRequest::new(params.page, params.limit, DEFAULT_PAGE_LIMIT);

    let status = ItemStatus::parse(params.status.as_deref().unwrap_or("available").trim())?;
    let approval_statuses =
        parse_approval_set(params.approval_status.as_deref().unwrap_or("approved"))?;

    let uploader_name = params
        .uploader_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let uploader_id = match (params.uploader, uploader_name) {
        (Some(id), _) => Some(id),
        (None, Some(name)) => match UserRepo::find_id_by_name(&state.pool, name).await? {
            Some(id) => Some(id),
            None => return Ok(Json(PagedResponse::new(Vec::new(), 0, &page))),
        },
        (None, None) => None,
    };

    let filter = ItemFilter {
        status,
        approval_statuses,
        uploader_id,
        category_id: params.category,
        exclude_id: None,
        sort_by: ItemSortField::from_query(params.sort_by.as_deref()),
        descending: params.sort_order.as_deref() == Some("desc"),
    };

    let (rows, total) = tokio::try_join!(
        ItemRepo::list(&state.pool, &filter, page.limit, page.offset()),
        ItemRepo::count(&state.pool, &filter),
    )?;

    let data = listed_item_views(state.storage.as_ref(), rows).await;
    Ok(Json(PagedResponse::new(data, total, &page)))
}

/// GET /api/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    ApiQuery(params): ApiQuery<ItemDetailParams>,
) -> AppResult<Json<ApiResponse<ItemDetailResponse>>> {
    let id = parse_id("item", &raw_id)?;

    let row = ItemRepo::find_with_relations(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let page = PageRequest::new(
        params.past_listings_page,
        params.past_listings_limit,
        DEFAULT_PAST_LISTINGS_LIMIT,
    );
    let filter = ItemFilter::past_listings(row.item.uploader_id, id);
    let (past_rows, past_total) = tokio::try_join!(
        ItemRepo::list(&state.pool, &filter, page.limit, page.offset()),
        ItemRepo::count(&state.pool, &filter),
    )?;

    let storage = state.storage.as_ref();
    let (image_url, past_listings) = tokio::join!(
        resolve_image_url(storage, &row.item.image_key),
        listed_item_views(storage, past_rows),
    );

    let category = row.category();
    let user = row.uploader();
    Ok(Json(ApiResponse::ok(ItemDetailResponse {
        item: ItemDetail {
            item: row.item,
            category,
            image_url,
        },
        uploader: UploaderListings {
            user,
            past_listings_count: past_listings.len(),
            past_listings,
            past_listings_total: past_total,
            past_listings_page: page.page,
            past_listings_total_pages: page.total_pages(past_total),
        },
    })))
}
