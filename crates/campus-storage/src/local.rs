use crate::keys::{generate_storage_key, validate_storage_key};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Objects land in `{base_path}/{bucket}/{filename}` and are served by whatever
/// static file server fronts `base_url`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/campus/uploads")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:4000/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with traversal checks
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_storage_key(storage_key)?;

        let path = self.base_path.join(storage_key);
        if path.strip_prefix(&self.base_path).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

/// Write `data` into the object just created at `path`.
///
/// A failed write removes the object again; a key is either complete or absent.
async fn fill_new_object(mut file: fs::File, path: &Path, data: &[u8]) -> StorageResult<()> {
    let written = async {
        file.write_all(data).await?;
        // tokio reports a failed buffered write on flush, not on write_all
        file.flush().await?;
        file.sync_all().await
    }
    .await;

    let Err(e) = written else {
        return Ok(());
    };

    drop(file);
    if let Err(cleanup) = fs::remove_file(path).await {
        tracing::warn!(
            path = %path.display(),
            error = %cleanup,
            "Failed to remove partially written object"
        );
    }
    Err(StorageError::UploadFailed(format!(
        "Failed to write file {}: {}",
        path.display(),
        e
    )))
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        bucket: &str,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        let key = generate_storage_key(bucket, filename)?;
        let path = self.key_to_path(&key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // Never overwrite an existing object
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        fill_new_object(file, &path, &data).await?;

        let url = self.public_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok((key, url))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage_in(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:4000/uploads/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_upload() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;
        let data = vec![0x89, 0x50, 0x4E, 0x47];

        let (key, url) = storage
            .upload("avatars", "1700000000000-abcdefghijkl.png", "image/png", data.clone())
            .await
            .unwrap();

        assert_eq!(key, "avatars/1700000000000-abcdefghijkl.png");
        assert_eq!(
            url,
            "http://localhost:4000/uploads/avatars/1700000000000-abcdefghijkl.png"
        );
        let written = std::fs::read(dir.path().join(&key)).unwrap();
        assert_eq!(written, data);
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_upload_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        storage
            .upload("avatars", "same.png", "image/png", b"first".to_vec())
            .await
            .unwrap();
        let second = storage
            .upload("avatars", "same.png", "image/png", b"second".to_vec())
            .await;

        assert!(matches!(second, Err(StorageError::UploadFailed(_))));
        let kept = std::fs::read(dir.path().join("avatars/same.png")).unwrap();
        assert_eq!(kept, b"first");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage_in(dir.path()).await;

        let result = storage
            .upload("avatars", "../../escape.png", "image/png", b"x".to_vec())
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        assert!(matches!(
            storage.key_to_path("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.key_to_path("avatars/../../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_object() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.png");
        std::fs::write(&path, b"").unwrap();

        // read-only handle: the write cannot succeed
        let file = fs::File::open(&path).await.unwrap();
        let result = fill_new_object(file, &path, &[0u8; 64]).await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!path.exists());
    }
}
