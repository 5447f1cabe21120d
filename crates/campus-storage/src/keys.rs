//! Shared key generation for storage backends.
//!
//! Key format: `{bucket}/{filename}`.

use crate::{StorageError, StorageResult};

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains("..") && !segment.contains(['/', '\\'])
}

/// Generate the storage key for `filename` in `bucket`.
///
/// Both parts must be single path segments so a key can never escape its bucket.
pub fn generate_storage_key(bucket: &str, filename: &str) -> StorageResult<String> {
    if !is_safe_segment(bucket) {
        return Err(StorageError::InvalidKey(format!("invalid bucket: {}", bucket)));
    }
    if !is_safe_segment(filename) {
        return Err(StorageError::InvalidKey(format!(
            "invalid filename: {}",
            filename
        )));
    }
    Ok(format!("{}/{}", bucket, filename))
}

/// Keys must be relative and free of parent references.
pub fn validate_storage_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(
            generate_storage_key("avatars", "1700000000000-abc123def456.png").unwrap(),
            "avatars/1700000000000-abc123def456.png"
        );
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(generate_storage_key("avatars", "../secret.png").is_err());
        assert!(generate_storage_key("avatars", "nested/file.png").is_err());
        assert!(generate_storage_key("..", "file.png").is_err());
        assert!(generate_storage_key("avatars", "").is_err());
        assert!(validate_storage_key("/etc/passwd").is_err());
        assert!(validate_storage_key("avatars/../../x").is_err());
        assert!(validate_storage_key("avatars/x.png").is_ok());
    }
}
