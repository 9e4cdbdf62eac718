//! Handlers for the `/categories` resource.

use axum::extract::State;
use axum::Json;
use rewear_db::models::category::Category;
use rewear_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::response::ListResponse;
use crate::state::AppState;

/// GET /api/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ListResponse<Category>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    let mut response = ListResponse::new(categories);
    if response.data.is_empty() {
        response.message = Some("No categories found".into());
    }
    Ok(Json(response))
}
