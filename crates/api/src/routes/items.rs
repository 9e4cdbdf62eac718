//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{items, swaps};
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET  /            -> list_items
/// GET  /{id}        -> get_item
/// POST /{id}/swap   -> complete_swap ({id} is the swap id)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items))
        .route("/{id}", get(items::get_item))
        .route("/{id}/swap", post(swaps::complete_swap))
}
