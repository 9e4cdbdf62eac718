use axum::routing::patch;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler extracts `RequireAdmin`.
///
/// ```text
/// PATCH /items/{id}/approval  -> set_item_approval
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/items/{id}/approval", patch(admin::set_item_approval))
}
