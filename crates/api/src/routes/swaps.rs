//! Route definitions for the `/swaps` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::swaps;
use crate::state::AppState;

/// Routes mounted at `/swaps`. All require auth.
///
/// ```text
/// GET  /              -> list_swaps
/// POST /              -> propose_swap
/// GET  /{id}          -> get_swap
/// POST /{id}/reject   -> reject_swap
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(swaps::list_swaps).post(swaps::propose_swap))
        .route("/{id}", get(swaps::get_swap))
        .route("/{id}/reject", post(swaps::reject_swap))
}
