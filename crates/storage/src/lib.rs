//! S3-compatible implementation of [`rewear_core::storage::ObjectStore`].

pub mod config;
pub mod s3;

pub use config::StorageConfig;
pub use s3::S3Gateway;
