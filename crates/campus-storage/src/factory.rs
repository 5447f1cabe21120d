#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use campus_core::Config;
use std::sync::Arc;

/// A setting the selected backend cannot run without
fn required(value: &Option<String>, variable: &str) -> StorageResult<String> {
    value
        .clone()
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", variable)))
}

/// Build the backend named by `STORAGE_BACKEND`
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let storage = S3Storage::new(
                required(&config.s3_bucket, "S3_BUCKET")?,
                required(&config.s3_region, "S3_REGION or AWS_REGION")?,
                config.s3_endpoint.clone(),
                config.s3_public_url.clone(),
            )?;
            Ok(Arc::new(storage))
        }

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                required(&config.local_storage_path, "LOCAL_STORAGE_PATH")?,
                required(&config.local_storage_base_url, "LOCAL_STORAGE_BASE_URL")?,
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[allow(unreachable_patterns)]
        backend => Err(StorageError::ConfigError(format!(
            "Storage backend '{}' is not compiled into this build",
            backend
        ))),
    }
}
