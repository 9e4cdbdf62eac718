//! Development-only error detail.
//!
//! [`AppError`](crate::error::AppError) attaches an [`ErrorDetail`] extension
//! to server-side failures. Outside production this layer swaps the body for
//! one that includes the underlying cause; in production the extension is
//! dropped and the generic body goes out unchanged.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_LENGTH;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::config::ServerConfig;
use crate::error::ErrorDetail;

/// Response mapper for [`axum::middleware::map_response_with_state`].
pub async fn attach_error_detail(
    State(config): State<Arc<ServerConfig>>,
    mut response: Response,
) -> Response {
    let Some(ErrorDetail(body)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if config.environment.is_production() {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    (parts, Json(body)).into_response()
}
