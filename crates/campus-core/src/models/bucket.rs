//! Upload bucket allow-list
//!
//! Buckets are compiled in rather than configured so the set of writable
//! partitions cannot drift between deployments. Unknown names are rejected.

use serde::Serialize;

pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_GIF: &str = "image/gif";
pub const IMAGE_WEBP: &str = "image/webp";
pub const VIDEO_MP4: &str = "video/mp4";
pub const VIDEO_WEBM: &str = "video/webm";
pub const VIDEO_QUICKTIME: &str = "video/quicktime";

const MB: usize = 1024 * 1024;

const WEB_IMAGES: &[&str] = &[IMAGE_JPEG, IMAGE_PNG, IMAGE_GIF, IMAGE_WEBP];
const PHOTO_IMAGES: &[&str] = &[IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP];
const WEB_VIDEOS: &[&str] = &[VIDEO_MP4, VIDEO_WEBM, VIDEO_QUICKTIME];

/// Size, type and privilege policy of one bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketConfig {
    pub name: &'static str,
    pub max_size_bytes: usize,
    pub allowed_mime_types: &'static [&'static str],
    pub requires_admin: bool,
}

impl BucketConfig {
    pub fn allows_mime_type(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }

    pub fn max_size_mb(&self) -> usize {
        self.max_size_bytes / MB
    }
}

/// Fixed set of buckets the upload handler may write to
#[derive(Debug, Clone)]
pub struct BucketRegistry {
    buckets: Vec<BucketConfig>,
}

impl BucketRegistry {
    pub fn new(buckets: Vec<BucketConfig>) -> Self {
        Self { buckets }
    }

    /// The buckets used by the school site
    pub fn builtin() -> Self {
        Self::new(vec![
            BucketConfig {
                name: "gallery-images",
                max_size_bytes: 10 * MB,
                allowed_mime_types: WEB_IMAGES,
                requires_admin: true,
            },
            BucketConfig {
                name: "gallery-videos",
                max_size_bytes: 50 * MB,
                allowed_mime_types: WEB_VIDEOS,
                requires_admin: true,
            },
            BucketConfig {
                name: "news-images",
                max_size_bytes: 5 * MB,
                allowed_mime_types: WEB_IMAGES,
                requires_admin: true,
            },
            BucketConfig {
                name: "staff-photos",
                max_size_bytes: 5 * MB,
                allowed_mime_types: PHOTO_IMAGES,
                requires_admin: true,
            },
            BucketConfig {
                name: "avatars",
                max_size_bytes: 2 * MB,
                allowed_mime_types: PHOTO_IMAGES,
                requires_admin: false,
            },
        ])
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, name: &str) -> Option<&BucketConfig> {
        self.buckets.iter().find(|bucket| bucket.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.buckets.iter().map(|bucket| bucket.name).collect()
    }

    /// Largest per-file limit across all buckets
    pub fn max_upload_size(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.max_size_bytes)
            .max()
            .unwrap_or(0)
    }
}

impl Default for BucketRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_bucket_is_rejected() {
        let registry = BucketRegistry::builtin();
        assert!(registry.get("gallery-images").is_some());
        assert!(registry.get("Gallery-Images").is_none());
        assert!(registry.get("../gallery-images").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_gallery_images_requires_admin() {
        let registry = BucketRegistry::builtin();
        let bucket = registry.get("gallery-images").unwrap();
        assert!(bucket.requires_admin);
        assert!(bucket.allows_mime_type("image/webp"));
        assert!(bucket.allows_mime_type("IMAGE/PNG"));
        assert!(!bucket.allows_mime_type("video/mp4"));
        assert_eq!(bucket.max_size_mb(), 10);
    }

    #[test]
    fn test_avatars_open_to_any_authenticated_user() {
        let registry = BucketRegistry::builtin();
        let bucket = registry.get("avatars").unwrap();
        assert!(!bucket.requires_admin);
        assert!(!bucket.allows_mime_type("image/gif"));
    }

    #[test]
    fn test_max_upload_size_is_largest_bucket() {
        assert_eq!(BucketRegistry::builtin().max_upload_size(), 50 * MB);
        assert_eq!(BucketRegistry::new(vec![]).max_upload_size(), 0);
    }
}
