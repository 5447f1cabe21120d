use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use campus_core::AppError;
use campus_processing::{UploadValidator, ValidationError};
use serde::Serialize;

use crate::auth::{require_admin, CurrentUser};
use crate::constants::UPLOAD_FAILURE_MESSAGE;
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use crate::utils::ip_extraction::ClientIdentity;
use crate::utils::upload::{extract_upload_form, generate_file_name};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub public_url: String,
    pub file_name: String,
    pub bucket: String,
}

/// Authenticated media upload
///
/// The caller never writes to storage directly: once identity, bucket policy
/// and content checks pass, the gateway stores the bytes with its own
/// credentials and records who uploaded what.
///
/// # Errors
/// - `AppError::Unauthorized` - missing or invalid bearer token (from the extractor)
/// - `AppError::InvalidInput` - missing file, unknown bucket, size or declared type refused
/// - `AppError::Forbidden` - bucket requires admin and the caller is not one
/// - `AppError::ContentIntegrity` - bytes do not carry the declared type's signature
/// - `AppError::Persistence` - storage write failed
#[tracing::instrument(
    skip_all,
    fields(user_id = %user.id, client_ip = %client_ip, operation = "upload_media")
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_ip): ClientIdentity,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        AppError::InvalidInput(format!("Expected a multipart form: {}", rejection.body_text()))
    })?;
    let form = extract_upload_form(multipart).await?;

    let bucket = form
        .bucket
        .as_deref()
        .and_then(|name| state.buckets.get(name))
        .ok_or_else(|| AppError::InvalidInput("Invalid bucket".to_string()))?;

    if bucket.requires_admin {
        if let Err(err) = require_admin(state.roles.as_ref(), &user).await {
            if matches!(err, AppError::Forbidden(_)) {
                audit::log_authorization_denied(user.id, &client_ip, bucket.name);
            }
            return Err(err.into());
        }
    }

    let validator = UploadValidator::for_bucket(bucket);
    if let Err(err) = validator.validate_all(&form.content_type, &form.data) {
        if let ValidationError::ContentMismatch { declared, detected } = &err {
            audit::log_content_integrity_violation(
                user.id,
                &client_ip,
                bucket.name,
                declared,
                *detected,
            );
        }
        return Err(err.into());
    }

    let file_name = generate_file_name(&form.content_type)?;
    let size_bytes = form.data.len();

    let (storage_key, public_url) = state
        .storage
        .upload(bucket.name, &file_name, &form.content_type, form.data)
        .await
        .map_err(|e| {
            AppError::persistence(UPLOAD_FAILURE_MESSAGE, AppError::Storage(e.to_string()))
        })?;

    tracing::info!(storage_key = %storage_key, size_bytes, "Media stored");
    audit::log_file_uploaded(
        user.id,
        &client_ip,
        bucket.name,
        &file_name,
        &form.content_type,
        size_bytes,
    );

    Ok(Json(UploadResponse {
        success: true,
        public_url,
        file_name,
        bucket: bucket.name.to_string(),
    }))
}
