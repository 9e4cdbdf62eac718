use std::sync::Arc;

use rewear_core::storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rewear_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object storage gateway for presigned image URLs.
    pub storage: Arc<dyn ObjectStore>,
}
