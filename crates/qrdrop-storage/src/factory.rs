#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
#[cfg(feature = "storage-uploadcare")]
use crate::UploadcareStorage;
use crate::{BlobStore, StorageBackend, StorageError, StorageResult};
use qrdrop_core::Config;
use std::sync::Arc;

/// Create a blob store based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn BlobStore>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-uploadcare")]
        StorageBackend::Uploadcare => {
            let public_key = config
                .uploadcare_public_key()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("UPLOADCARE_PUBLIC_KEY not configured".to_string())
                })?;

            let storage = UploadcareStorage::new(
                public_key,
                config.uploadcare_upload_url().to_string(),
                config.uploadcare_cdn_url().to_string(),
                std::time::Duration::from_secs(config.uploadcare_timeout_secs()),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-uploadcare"))]
        StorageBackend::Uploadcare => Err(StorageError::ConfigError(
            "Uploadcare backend not available (storage-uploadcare feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
