use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rewear_core::error::CoreError;
use rewear_core::storage::StorageError;
use rewear_core::swap::SwapError;
use rewear_db::repositories::SwapTransitionError;
use serde::Serialize;

use crate::auth::jwt::TokenError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain, swap, storage, and database errors and adds the
/// session-token variants. Implements [`IntoResponse`] to produce
/// `{ "success": false, "message": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `rewear_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A swap precondition failed.
    #[error(transparent)]
    Swap(#[from] SwapError),

    /// The object storage gateway could not issue a URL.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<SwapTransitionError> for AppError {
    fn from(err: SwapTransitionError) -> Self {
        match err {
            SwapTransitionError::Rejected(e) => AppError::Swap(e),
            SwapTransitionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired,
            TokenError::Invalid => AppError::InvalidToken,
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub code: &'static str,
    /// Underlying cause; only rendered outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response extension carrying the body of a server-side failure together
/// with its cause, so the router can expose the cause in development.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub ErrorBody);

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, detail) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                    None,
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone(), None)
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                        Some(msg.clone()),
                    )
                }
            },

            // --- Swap preconditions ---
            AppError::Swap(err) => {
                let status = match err {
                    SwapError::NotFound { .. } => StatusCode::NOT_FOUND,
                    SwapError::NotReceiver => StatusCode::FORBIDDEN,
                    SwapError::NotPending { .. }
                    | SwapError::RequestedItemUnavailable
                    | SwapError::OfferedItemUnavailable
                    | SwapError::InsufficientPoints { .. } => StatusCode::CONFLICT,
                };
                (status, err.code(), err.to_string(), None)
            }

            // --- Collaborators ---
            AppError::Storage(err) => {
                tracing::error!(error = %err, "Object storage error");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "Object storage is unavailable".to_string(),
                    Some(err.to_string()),
                )
            }
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Session ---
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid token".to_string(),
                None,
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token expired".to_string(),
                None,
            ),

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    Some(msg.clone()),
                )
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            code,
            error: None,
        };
        let mut response = (status, axum::Json(body.clone())).into_response();
        if let Some(cause) = detail {
            response.extensions_mut().insert(ErrorDetail(ErrorBody {
                error: Some(cause),
                ..body
            }));
        }
        response
    }
}

/// Classify a sqlx error into an HTTP status, error code, message, and cause.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String, Option<String>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint == "uq_users_email" {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        "Email already registered".to_string(),
                        None,
                    );
                }
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
                Some(db_err.to_string()),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
                Some(other.to_string()),
            )
        }
    }
}
