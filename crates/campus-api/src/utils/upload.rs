//! Multipart parsing and file naming for the media upload handler

use axum::extract::Multipart;
use campus_core::AppError;
use campus_processing::extension_for_mime;
use rand::Rng;

const RANDOM_SUFFIX_LEN: usize = 12;
const RANDOM_SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Fields of an upload form
#[derive(Debug)]
pub struct UploadForm {
    pub data: Vec<u8>,
    /// Declared MIME type of the `file` part, parameters stripped, lowercased
    pub content_type: String,
    pub bucket: Option<String>,
}

/// Read the `file` and `bucket` fields. Only one field named "file" is
/// accepted; other fields are skipped.
pub async fn extract_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut bucket: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("file") => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let content_type = normalize_mime_type(
                    field.content_type().unwrap_or("application/octet-stream"),
                );
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                file = Some((data.to_vec(), content_type));
            }
            Some("bucket") => {
                let value = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read bucket field: {}", e))
                })?;
                bucket = Some(value.trim().to_string()).filter(|name| !name.is_empty());
            }
            _ => {}
        }
    }

    let (data, content_type) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    Ok(UploadForm {
        data,
        content_type,
        bucket,
    })
}

/// "image/jpeg; charset=binary" -> "image/jpeg"
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
        .to_lowercase()
}

/// Storage name for an upload: `{unix_millis}-{random}.{ext}`.
///
/// The extension comes from the validated MIME type. The client's file name
/// never reaches storage.
pub fn generate_file_name(content_type: &str) -> Result<String, AppError> {
    let extension = extension_for_mime(content_type).ok_or_else(|| {
        AppError::Internal(format!("No file extension known for {}", content_type))
    })?;

    let mut rng = rand::rng();
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| RANDOM_SUFFIX_CHARSET[rng.random_range(0..RANDOM_SUFFIX_CHARSET.len())] as char)
        .collect();

    Ok(format!(
        "{}-{}.{}",
        chrono::Utc::now().timestamp_millis(),
        suffix,
        extension
    ))
}
