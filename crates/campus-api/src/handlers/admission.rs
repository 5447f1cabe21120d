use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Response;
use bytes::Bytes;
use campus_core::validation::validate_admission;
use campus_core::{AdmissionSubmission, AppError};

use crate::constants::{
    ADMISSION_FAILURE_MESSAGE, ADMISSION_SUCCESS_MESSAGE, SUBMIT_ADMISSION_PATH,
};
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use crate::utils::ip_extraction::ClientIdentity;
use crate::utils::submission::{enforce_rate_limit, parse_json_body, submission_success};

/// Admission application submission
///
/// Same pipeline as the contact form with a tighter quota. Ages are measured
/// against today's UTC date.
#[tracing::instrument(skip_all, fields(client_ip = %client_ip, operation = "submit_admission"))]
pub async fn submit_admission(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_ip): ClientIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpAppError> {
    let decision = enforce_rate_limit(
        state.admission_limiter.as_ref(),
        &client_ip,
        SUBMIT_ADMISSION_PATH,
    )
    .await?;

    let payload: AdmissionSubmission = parse_json_body(&body?)?;

    if payload.is_bot() {
        audit::log_honeypot_triggered(&client_ip, SUBMIT_ADMISSION_PATH);
        return Ok(submission_success(ADMISSION_SUCCESS_MESSAGE, &decision));
    }

    let today = chrono::Utc::now().date_naive();
    let application = validate_admission(&payload, today).map_err(AppError::Validation)?;

    let id = state
        .submissions
        .insert_admission_application(application)
        .await
        .map_err(|e| AppError::persistence(ADMISSION_FAILURE_MESSAGE, e))?;

    tracing::info!(application_id = %id, remaining = decision.remaining, "Admission application stored");
    Ok(submission_success(ADMISSION_SUCCESS_MESSAGE, &decision))
}
