//! Admin-only moderation handlers.

use axum::extract::{Path, State};
use axum::Json;
use rewear_core::catalog::ApprovalStatus;
use rewear_core::error::{parse_id, CoreError};
use rewear_core::validation::require_fields;
use rewear_db::models::item::Item;
use rewear_db::repositories::ItemRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `PATCH /admin/items/{id}/approval`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SetApprovalRequest {
    pub approval_status: Option<String>,
}

/// PATCH /api/admin/items/{id}/approval
///
/// Swapped items are immutable and answer 409.
pub async fn set_item_approval(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
    ApiJson(input): ApiJson<SetApprovalRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let id = parse_id("item", &raw_id)?;
    require_fields(&[("approvalStatus", input.approval_status.as_deref())])?;
    let approval_status = ApprovalStatus::parse(
        input.approval_status.as_deref().unwrap_or_default().trim(),
    )?;

    let Some(item) = ItemRepo::set_approval_status(&state.pool, id, approval_status).await? else {
        return Err(match ItemRepo::find_by_id(&state.pool, id).await? {
            Some(_) => AppError::Core(CoreError::Conflict(
                "Swapped items cannot be moderated".into(),
            )),
            None => AppError::Core(CoreError::NotFound { entity: "Item", id }),
        });
    };

    tracing::info!(
        item_id = item.id,
        admin_id = admin.user.id,
        approval_status = %approval_status,
        "Item approval updated",
    );

    Ok(Json(ApiResponse::with_message("Item approval updated", item)))
}
