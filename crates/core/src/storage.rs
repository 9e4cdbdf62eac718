//! Object storage gateway contract.
//!
//! Item images never pass through the API. The gateway hands out short-lived
//! presigned URLs keyed by an opaque image key, and clients talk to the
//! bucket directly.

use async_trait::async_trait;

/// Failures issuing a presigned URL.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// A required setting (bucket, region, credentials) is missing.
    #[error("Object storage is not configured: {0} is not set")]
    NotConfigured(&'static str),

    /// The SDK refused to sign the request.
    #[error("Failed to presign request: {0}")]
    Presign(String),
}

/// Issues presigned upload and download URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Presigned `PUT` for `key`, short-lived (minutes).
    async fn issue_upload_url(&self, key: &str, content_type: &str)
        -> Result<String, StorageError>;

    /// Presigned `GET` for `key`, longer-lived (about an hour).
    async fn issue_download_url(&self, key: &str) -> Result<String, StorageError>;
}
