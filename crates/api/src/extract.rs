//! Request extractors whose rejections render as [`AppError`] bodies.
//!
//! `axum::Json` and `axum::extract::Query` reject malformed input with a
//! plain-text response. These wrappers route the rejection through
//! `AppError` so every failure carries `{ success, message, code }`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// JSON request body. A missing content type, malformed JSON or a type
/// mismatch is a `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters. An undecodable query string is a
/// `VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
