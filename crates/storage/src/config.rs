use std::time::Duration;

/// Default lifetime of a presigned upload URL.
pub const DEFAULT_UPLOAD_URL_TTL_SECS: u64 = 120;

/// Default lifetime of a presigned download URL.
pub const DEFAULT_DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Object storage settings loaded from environment variables.
///
/// Bucket, region, and credentials are optional at startup so the server can
/// run without object storage; requests that need it then fail with
/// [`rewear_core::storage::StorageError::NotConfigured`].
#[derive(Clone, Default)]
pub struct StorageConfig {
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub upload_url_ttl: Duration,
    pub download_url_ttl: Duration,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "[REDACTED]"))
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("upload_url_ttl", &self.upload_url_ttl)
            .field("download_url_ttl", &self.download_url_ttl)
            .finish()
    }
}

impl StorageConfig {
    /// Load from the process environment.
    ///
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `BUCKET_NAME`           | unset   |
    /// | `AWS_REGION`            | unset   |
    /// | `AWS_ACCESS_KEY_ID`     | unset   |
    /// | `AWS_SECRET_ACCESS_KEY` | unset   |
    /// | `UPLOAD_URL_TTL_SECS`   | `120`   |
    /// | `DOWNLOAD_URL_TTL_SECS` | `3600`  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let upload_secs: u64 = get("UPLOAD_URL_TTL_SECS")
            .map(|v| v.parse().expect("UPLOAD_URL_TTL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_UPLOAD_URL_TTL_SECS);
        let download_secs: u64 = get("DOWNLOAD_URL_TTL_SECS")
            .map(|v| v.parse().expect("DOWNLOAD_URL_TTL_SECS must be a valid u64"))
            .unwrap_or(DEFAULT_DOWNLOAD_URL_TTL_SECS);

        Self {
            bucket: get("BUCKET_NAME"),
            region: get("AWS_REGION"),
            access_key_id: get("AWS_ACCESS_KEY_ID"),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY"),
            upload_url_ttl: Duration::from_secs(upload_secs),
            download_url_ttl: Duration::from_secs(download_secs),
        }
    }

    /// The first required setting that is absent, by its env var name.
    pub fn missing_setting(&self) -> Option<&'static str> {
        [
            ("BUCKET_NAME", &self.bucket),
            ("AWS_REGION", &self.region),
            ("AWS_ACCESS_KEY_ID", &self.access_key_id),
            ("AWS_SECRET_ACCESS_KEY", &self.secret_access_key),
        ]
        .into_iter()
        .find(|(_, value)| value.is_none())
        .map(|(name, _)| name)
    }
}
