//! Shared response envelope types for API handlers.
//!
//! Successful responses use `{ "success": true, "message"?: ..., "data": ... }`.
//! List endpoints add `count`, and paginated ones add `total`, `page` and
//! `totalPages`.

use rewear_core::pagination::PageRequest;
use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok(item)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Unpaginated list envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Vec<T>,
    pub count: usize,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: data.len(),
            data,
        }
    }
}

/// Paginated list envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    /// Rows on this page.
    pub count: usize,
    /// Rows across all pages.
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, page: &PageRequest) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
            total,
            page: page.page,
            total_pages: page.total_pages(total),
        }
    }
}
