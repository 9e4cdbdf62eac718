use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use rewear_core::storage::{ObjectStore, StorageError};

use crate::config::StorageConfig;

/// Name recorded as the provider of the static credentials.
const CREDENTIALS_PROVIDER: &str = "rewear-env";

/// A signing client bound to a bucket.
#[derive(Debug, Clone)]
struct Bucket {
    client: Client,
    name: String,
}

/// Presigns S3 requests for item images.
///
/// Built from a possibly incomplete [`StorageConfig`]; when a setting is
/// missing every call fails with [`StorageError::NotConfigured`] naming it.
#[derive(Debug, Clone)]
pub struct S3Gateway {
    bucket: Result<Bucket, &'static str>,
    upload_url_ttl: Duration,
    download_url_ttl: Duration,
}

impl S3Gateway {
    pub async fn from_config(config: &StorageConfig) -> Self {
        let bucket = match (
            &config.bucket,
            &config.region,
            &config.access_key_id,
            &config.secret_access_key,
        ) {
            (Some(bucket), Some(region), Some(access_key_id), Some(secret_access_key)) => {
                let credentials = Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    CREDENTIALS_PROVIDER,
                );
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region.clone()))
                    .credentials_provider(credentials)
                    .load()
                    .await;
                tracing::info!(bucket = %bucket, region = %region, "Object storage configured");
                Ok(Bucket {
                    client: Client::new(&shared),
                    name: bucket.clone(),
                })
            }
            _ => {
                let missing = config.missing_setting().unwrap_or("BUCKET_NAME");
                tracing::warn!(
                    missing,
                    "Object storage is not configured; image URLs are unavailable"
                );
                Err(missing)
            }
        };

        Self {
            bucket,
            upload_url_ttl: config.upload_url_ttl,
            download_url_ttl: config.download_url_ttl,
        }
    }

    /// Whether bucket, region, and credentials were all present.
    pub fn is_configured(&self) -> bool {
        self.bucket.is_ok()
    }

    fn bucket(&self) -> Result<&Bucket, StorageError> {
        self.bucket
            .as_ref()
            .map_err(|missing| StorageError::NotConfigured(*missing))
    }
}

fn presigning(ttl: Duration) -> Result<PresigningConfig, StorageError> {
    PresigningConfig::expires_in(ttl).map_err(|e| StorageError::Presign(e.to_string()))
}

#[async_trait]
impl ObjectStore for S3Gateway {
    async fn issue_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let bucket = self.bucket()?;
        let request = bucket
            .client
            .put_object()
            .bucket(&bucket.name)
            .key(key)
            .content_type(content_type)
            .presigned(presigning(self.upload_url_ttl)?)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;
        Ok(request.uri().to_string())
    }

    async fn issue_download_url(&self, key: &str) -> Result<String, StorageError> {
        let bucket = self.bucket()?;
        let request = bucket
            .client
            .get_object()
            .bucket(&bucket.name)
            .key(key)
            .presigned(presigning(self.download_url_ttl)?)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;
        Ok(request.uri().to_string())
    }
}
