use std::sync::Arc;

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::response::Response;
use bytes::Bytes;
use campus_core::validation::validate_contact;
use campus_core::{AppError, ContactSubmission};

use crate::constants::{CONTACT_FAILURE_MESSAGE, CONTACT_SUCCESS_MESSAGE, SUBMIT_CONTACT_PATH};
use crate::error::HttpAppError;
use crate::middleware::audit;
use crate::state::AppState;
use crate::utils::ip_extraction::ClientIdentity;
use crate::utils::submission::{enforce_rate_limit, parse_json_body, submission_success};

/// Contact form submission
///
/// Rate limit, parse, honeypot, validate (all fields), persist. The quota is
/// consumed before the body is looked at.
#[tracing::instrument(skip_all, fields(client_ip = %client_ip, operation = "submit_contact"))]
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    ClientIdentity(client_ip): ClientIdentity,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, HttpAppError> {
    let decision =
        enforce_rate_limit(state.contact_limiter.as_ref(), &client_ip, SUBMIT_CONTACT_PATH).await?;

    let payload: ContactSubmission = parse_json_body(&body?)?;

    if payload.is_bot() {
        audit::log_honeypot_triggered(&client_ip, SUBMIT_CONTACT_PATH);
        return Ok(submission_success(CONTACT_SUCCESS_MESSAGE, &decision));
    }

    let message = validate_contact(&payload).map_err(AppError::Validation)?;

    let id = state
        .submissions
        .insert_contact_message(message)
        .await
        .map_err(|e| AppError::persistence(CONTACT_FAILURE_MESSAGE, e))?;

    tracing::info!(message_id = %id, remaining = decision.remaining, "Contact message stored");
    Ok(submission_success(CONTACT_SUCCESS_MESSAGE, &decision))
}
