#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rewear_api::auth::jwt::JwtConfig;
use rewear_api::auth::password::hash_password;
use rewear_api::config::{Environment, ServerConfig};
use rewear_api::router::build_app_router;
use rewear_api::state::AppState;
use rewear_core::catalog::{
    ApprovalStatus, CategoryName, Condition, ItemType, Role, Size, SwapPreference,
};
use rewear_core::storage::{ObjectStore, StorageError};
use rewear_core::types::{DbId, Points};
use rewear_db::models::item::{CreateItem, Item};
use rewear_db::models::user::{CreateUser, User};
use rewear_db::repositories::{ItemRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(environment: Environment) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        environment,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            expiry_days: 7,
        },
    }
}

// ---------------------------------------------------------------------------
// Fake object storage
// ---------------------------------------------------------------------------

/// Issues deterministic URLs without touching the network.
pub struct FakeStore;

#[async_trait]
impl ObjectStore for FakeStore {
    async fn issue_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        Ok(format!("https://fake-bucket.test/{key}?upload&type={content_type}"))
    }

    async fn issue_download_url(&self, key: &str) -> Result<String, StorageError> {
        Ok(format!("https://fake-bucket.test/{key}?download"))
    }
}

/// Behaves like a gateway with no bucket configured.
pub struct FailingStore;

#[async_trait]
impl ObjectStore for FailingStore {
    async fn issue_upload_url(&self, _: &str, _: &str) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured("BUCKET_NAME"))
    }

    async fn issue_download_url(&self, _: &str) -> Result<String, StorageError> {
        Err(StorageError::NotConfigured("BUCKET_NAME"))
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Full router with a working fake gateway, in development mode.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Arc::new(FakeStore), Environment::Development)
}

/// Full router with a caller-chosen gateway and environment.
pub fn build_test_app_with(
    pool: PgPool,
    storage: Arc<dyn ObjectStore>,
    environment: Environment,
) -> Router {
    let config = test_config(environment);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// How a request authenticates.
#[derive(Clone, Copy)]
pub enum Session<'a> {
    Anonymous,
    Cookie(&'a str),
    Bearer(&'a str),
}

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    session: Session<'_>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    match session {
        Session::Anonymous => {}
        Session::Cookie(token) => builder = builder.header(COOKIE, format!("token={token}")),
        Session::Bearer(token) => {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"))
        }
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Session::Anonymous).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, Session::Cookie(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Session::Anonymous).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(body), Session::Cookie(token)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body), Session::Cookie(token)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `token` value from a response's `Set-Cookie` header.
pub fn session_token(response: &Response<Body>) -> Option<String> {
    let cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let value = cookie.split(';').next()?.strip_prefix("token=")?;
    Some(value.to_string())
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and the given balance.
pub async fn create_user(pool: &PgPool, name: &str, points: Points) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: format!("{}@rewear.test", name.to_lowercase()),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            name: name.to_string(),
            location: Some("Bristol".to_string()),
            avatar_seed: Some(format!("{}-abc123", name.to_lowercase())),
        },
    )
    .await
    .unwrap();
    sqlx::query("UPDATE users SET points = $2 WHERE id = $1")
        .bind(user.id)
        .bind(points)
        .execute(pool)
        .await
        .unwrap();
    UserRepo::find_by_id(pool, user.id).await.unwrap().unwrap()
}

pub async fn create_admin(pool: &PgPool, name: &str) -> User {
    let user = create_user(pool, name, 50).await;
    UserRepo::set_role(pool, user.id, Role::Admin).await.unwrap();
    UserRepo::find_by_id(pool, user.id).await.unwrap().unwrap()
}

/// Sign a session token for `user` with the test secret.
pub fn token_for(user: &User) -> String {
    rewear_api::auth::jwt::generate_token(user.id, &test_config(Environment::Development).jwt)
        .unwrap()
}

pub async fn category_id(pool: &PgPool, name: CategoryName) -> DbId {
    let row: (DbId,) = sqlx::query_as("SELECT id FROM categories WHERE name = $1")
        .bind(name.as_str())
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

/// Insert an item and, when `approval` is given, moderate it.
pub async fn create_item(
    pool: &PgPool,
    uploader_id: DbId,
    title: &str,
    approval: Option<ApprovalStatus>,
) -> Item {
    let category_id = category_id(pool, CategoryName::Jacket).await;
    let item = ItemRepo::create(
        pool,
        &CreateItem {
            title: title.to_string(),
            description: format!("{title}, worn twice"),
            category_id,
            item_type: ItemType::Unisex,
            size: Size::M,
            condition: Condition::Good,
            image_key: format!("uploads/{uploader_id}-{title}.jpeg"),
            points_required: 20,
            uploader_id,
            swap_preference: SwapPreference::Both,
        },
    )
    .await
    .unwrap();
    match approval {
        Some(status) => ItemRepo::set_approval_status(pool, item.id, status)
            .await
            .unwrap()
            .unwrap(),
        None => item,
    }
}
