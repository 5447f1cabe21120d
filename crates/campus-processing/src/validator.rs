use campus_core::BucketConfig;

use crate::magic::{sniff_mime_type, validate_magic_bytes};

const MB: usize = 1024 * 1024;

/// Reasons an upload is refused before it reaches storage
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File is empty")]
    EmptyFile,

    #[error("File too large. Maximum size is {}MB", .max / MB)]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file type. Allowed types: {}", .allowed.join(", "))]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File content does not match declared type. The file may be corrupted or malicious.")]
    ContentMismatch {
        declared: String,
        detected: Option<&'static str>,
    },
}

impl ValidationError {
    /// Content that lies about its type is a security event, not a user mistake.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, ValidationError::ContentMismatch { .. })
    }
}

/// Upload validator bound to one bucket's policy
///
/// Checks run in a fixed order: size, declared type, then content signature.
/// Each check only runs if the previous one passed.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|ct| ct.to_lowercase())
                .collect(),
        }
    }

    pub fn for_bucket(bucket: &BucketConfig) -> Self {
        Self::new(
            bucket.max_size_bytes,
            bucket
                .allowed_mime_types
                .iter()
                .map(|ct| ct.to_string())
                .collect(),
        )
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate declared content type
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = content_type.trim().to_lowercase();

        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate that the leading bytes carry the declared type's signature
    pub fn validate_content(&self, content_type: &str, data: &[u8]) -> Result<(), ValidationError> {
        if !validate_magic_bytes(data, content_type) {
            return Err(ValidationError::ContentMismatch {
                declared: content_type.to_string(),
                detected: sniff_mime_type(data),
            });
        }

        Ok(())
    }

    pub fn validate_all(&self, content_type: &str, data: &[u8]) -> Result<(), ValidationError> {
        self.validate_file_size(data.len())?;
        self.validate_content_type(content_type)?;
        self.validate_content(content_type, data)?;
        Ok(())
    }
}
