//! Handlers for the swap lifecycle: propose, list, fetch, reject, complete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rewear_core::catalog::SwapStatus;
use rewear_core::error::{parse_id, CoreError};
use rewear_core::pagination::{PageRequest, DEFAULT_PAGE_LIMIT};
use rewear_core::swap::{validate_proposal, ProposalContext};
use rewear_core::types::{DbId, Points};
use rewear_db::models::item::Item;
use rewear_db::models::swap::{CompletedSwap, CreateSwap, Swap};
use rewear_db::repositories::{ItemRepo, SwapRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::images::{item_view, ItemView};
use crate::middleware::auth::AuthUser;
use crate::query::SwapListParams;
use crate::response::{ApiResponse, PagedResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /swaps`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProposeSwapRequest {
    pub requested_item: Option<DbId>,
    pub offered_item: Option<DbId>,
    pub points_used: Option<Points>,
}

/// A completed swap with both items (now `swapped`) and the resulting
/// balances.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSwapResponse {
    #[serde(flatten)]
    pub swap: Swap,
    pub requested_item: ItemView,
    pub offered_item: Option<ItemView>,
    pub requester_points: Points,
    pub receiver_points: Points,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/swaps
///
/// Propose a trade for another user's item. The receiver is the requested
/// item's uploader. The balance check here is advisory; completion
/// re-checks it under lock.
pub async fn propose_swap(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<ProposeSwapRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Swap>>)> {
    let requested_id = input.requested_item.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Missing required fields: requestedItem".into(),
        ))
    })?;
    let points_used = input.points_used.unwrap_or(0);

    let requested = find_item(&state, requested_id).await?;
    let offered = match input.offered_item {
        Some(id) => Some(find_item(&state, id).await?),
        None => None,
    };

    validate_proposal(&ProposalContext {
        requester_id: auth.user.id,
        requester_points: auth.user.points,
        requested_item: requested.snapshot(),
        offered_item: offered.as_ref().map(Item::snapshot),
        points_used,
    })?;

    let swap = SwapRepo::create(
        &state.pool,
        &CreateSwap {
            requester_id: auth.user.id,
            receiver_id: requested.uploader_id,
            requested_item_id: requested.id,
            offered_item_id: offered.as_ref().map(|item| item.id),
            points_used,
        },
    )
    .await?;

    tracing::info!(
        swap_id = swap.id,
        requester_id = swap.requester_id,
        receiver_id = swap.receiver_id,
        "Swap proposed",
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Swap proposed", swap)),
    ))
}

/// GET /api/swaps
///
/// The caller's swaps, newest first, optionally narrowed by side and status.
pub async fn list_swaps(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(params): ApiQuery<SwapListParams>,
) -> AppResult<Json<PagedResponse<Swap>>> {
    let status = params
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SwapStatus::parse)
        .transpose()?;
    let page = PageRequest::new(params.page, params.limit, DEFAULT_PAGE_LIMIT);

    let (swaps, total) = tokio::try_join!(
        SwapRepo::list_for_user(&state.pool, auth.user.id, params.role, status, page),
        SwapRepo::count_for_user(&state.pool, auth.user.id, params.role, status),
    )?;

    Ok(Json(PagedResponse::new(swaps, total, &page)))
}

/// GET /api/swaps/{id}
///
/// Visible to the requester and the receiver only.
pub async fn get_swap(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<ApiResponse<Swap>>> {
    let id = parse_id("swap", &raw_id)?;
    let swap = SwapRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Swap", id }))?;

    if swap.requester_id != auth.user.id && swap.receiver_id != auth.user.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You are not a participant in this swap".into(),
        )));
    }

    Ok(Json(ApiResponse::ok(swap)))
}

/// POST /api/swaps/{id}/reject
pub async fn reject_swap(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<ApiResponse<Swap>>> {
    let id = parse_id("swap", &raw_id)?;
    let swap = SwapRepo::reject(&state.pool, id, auth.user.id).await?;

    tracing::info!(swap_id = swap.id, receiver_id = auth.user.id, "Swap rejected");

    Ok(Json(ApiResponse::with_message("Swap rejected", swap)))
}

/// POST /api/items/{id}/swap
///
/// Complete the swap whose id is `{id}`. Only the receiver may do this. The
/// points transfer, status change, and item flips commit together; image
/// URL resolution happens afterwards and never fails the request.
pub async fn complete_swap(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(raw_id): Path<String>,
) -> AppResult<Json<ApiResponse<CompletedSwapResponse>>> {
    let id = parse_id("swap", &raw_id)?;
    let CompletedSwap {
        swap,
        requested_item,
        offered_item,
        requester_points,
        receiver_points,
    } = SwapRepo::complete(&state.pool, id, auth.user.id).await?;

    let storage = state.storage.as_ref();
    let (requested_item, offered_item) = tokio::join!(
        item_view(storage, requested_item),
        async move {
            match offered_item {
                Some(item) => Some(item_view(storage, item).await),
                None => None,
            }
        },
    );

    Ok(Json(ApiResponse::with_message(
        "Swap completed successfully",
        CompletedSwapResponse {
            swap,
            requested_item,
            offered_item,
            requester_points,
            receiver_points,
        },
    )))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_item(state: &AppState, id: DbId) -> AppResult<Item> {
    ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))
}
