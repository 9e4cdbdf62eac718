//! Tests for `AppError` → HTTP response mapping and the development-only
//! error detail layer.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, Response, StatusCode};
use axum::response::IntoResponse;
use common::{body_json, get, post_json, post_json_auth, FailingStore};
use http_body_util::BodyExt;
use rewear_api::config::Environment;
use rewear_api::error::AppError;
use rewear_core::catalog::{CategoryName, SwapStatus};
use rewear_core::error::CoreError;
use rewear_core::swap::SwapError;
use sqlx::PgPool;
use tower::ServiceExt;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotFound {
        entity: "Item",
        id: 42,
    }))
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "Item not found");
}

#[tokio::test]
async fn swap_not_pending_returns_409() {
    let (status, json) = error_to_response(AppError::Swap(SwapError::NotPending {
        status: SwapStatus::Rejected,
    }))
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "SWAP_NOT_PENDING");
    assert_eq!(json["message"], "Swap is not in pending status");
}

#[tokio::test]
async fn internal_error_body_hides_cause() {
    let (status, json) =
        error_to_response(AppError::InternalError("pool exhausted".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["message"], "An internal error occurred");
    assert!(json.get("error").is_none());
}

async fn create_with_failing_storage(pool: PgPool, environment: Environment) -> serde_json::Value {
    let user = common::create_user(&pool, "Uploader", 50).await;
    let category = common::category_id(&pool, CategoryName::Coat).await;
    let app = common::build_test_app_with(pool, Arc::new(FailingStore), environment);

    let response = post_json_auth(
        app,
        "/api/upload/item",
        serde_json::json!({
            "title": "Trench",
            "description": "Beige",
            "category": category,
            "type": "unisex",
            "size": "L",
            "condition": "good",
        }),
        &common::token_for(&user),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    body_json(response).await
}

#[sqlx::test(migrations = "../db/migrations")]
async fn development_exposes_error_detail(pool: PgPool) {
    let json = create_with_failing_storage(pool, Environment::Development).await;

    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert_eq!(json["message"], "Object storage is unavailable");
    assert_eq!(
        json["error"],
        "Object storage is not configured: BUCKET_NAME is not set"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn production_hides_error_detail(pool: PgPool) {
    let json = create_with_failing_storage(pool, Environment::Production).await;

    assert_eq!(json["code"], "STORAGE_ERROR");
    assert!(json.get("error").is_none());
}

// ---------------------------------------------------------------------------
// Extractor rejections
// ---------------------------------------------------------------------------

async fn send_raw(
    pool: PgPool,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    common::build_test_app(pool).oneshot(request).await.unwrap()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_json_body_returns_validation_envelope(pool: PgPool) {
    let response = send_raw(
        pool,
        "/api/auth/register",
        Some("application/json"),
        "{\"email\": ",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn mistyped_json_field_returns_validation_envelope(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/auth/register",
        serde_json::json!({ "email": 5 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_content_type_returns_validation_envelope(pool: PgPool) {
    let response = send_raw(
        pool,
        "/api/auth/signin",
        None,
        "{\"email\":\"a@b.test\",\"password\":\"x\"}",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["message"]
        .as_str()
        .is_some_and(|m| m.contains("Content-Type")));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn undecodable_query_returns_validation_envelope(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/items?uploader=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unparsable_page_falls_back_to_first_page(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/items?page=abc&limit=zz").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["page"], 1);
    assert_eq!(json["total"], 0);
}
