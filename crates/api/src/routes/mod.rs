pub mod admin;
pub mod auth;
pub mod categories;
pub mod health;
pub mod items;
pub mod swaps;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/signin                         signin (public)
/// /auth/signout                        signout (requires auth)
/// /auth/me                             current user (requires auth)
///
/// /categories                          list (public)
///
/// /upload/item                         create item + upload URL (requires auth)
///
/// /items                               list (public)
/// /items/{id}                          detail + past listings (public)
/// /items/{id}/swap                     complete swap {id} (receiver only)
///
/// /swaps                               list own, propose (requires auth)
/// /swaps/{id}                          get (participants only)
/// /swaps/{id}/reject                   reject (receiver only)
///
/// /admin/items/{id}/approval           set approval status (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .route("/upload/item", post(handlers::items::create_item))
        .nest("/items", items::router())
        .nest("/swaps", swaps::router())
        .nest("/admin", admin::router())
}
