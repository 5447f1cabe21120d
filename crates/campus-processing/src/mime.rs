use campus_core::models::bucket::{
    IMAGE_GIF, IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP, VIDEO_MP4, VIDEO_QUICKTIME, VIDEO_WEBM,
};

/// File extension for a validated MIME type.
///
/// Stored names never reuse the client's file name, so this is the only source
/// of the extension.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    let extension = match mime_type.trim().to_ascii_lowercase().as_str() {
        IMAGE_JPEG => "jpg",
        IMAGE_PNG => "png",
        IMAGE_GIF => "gif",
        IMAGE_WEBP => "webp",
        VIDEO_MP4 => "mp4",
        VIDEO_WEBM => "webm",
        VIDEO_QUICKTIME => "mov",
        _ => return None,
    };
    Some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_mime() {
        assert_eq!(extension_for_mime("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for_mime("Video/QuickTime"), Some("mov"));
        assert_eq!(extension_for_mime("application/x-php"), None);
    }
}
