//! Whole-payload validation for the contact and admission forms.
//!
//! Every field is checked before the result is decided. On success the payload is
//! normalized into the row that gets inserted; on failure the caller receives every
//! violation in form order.

use chrono::NaiveDate;
use validator::{Validate, ValidationErrors};

use super::fields::{normalize_choice, parse_date_of_birth};
use super::rules::{self, GENDERS};
use crate::models::{
    AdmissionSubmission, ContactSubmission, NewAdmissionApplication, NewContactMessage,
};

const CONTACT_FIELD_ORDER: &[&str] = &["name", "email", "subject", "message"];

const ADMISSION_FIELD_ORDER: &[&str] = &[
    "student_name",
    "date_of_birth",
    "gender",
    "parent_name",
    "parent_email",
    "parent_phone",
    "address",
    "grade_applying_for",
    "previous_school",
    "additional_info",
];

/// Flatten `errors` into client messages. The error map is unordered, so the
/// output follows `field_order`.
fn messages_in_order(errors: &ValidationErrors, field_order: &[&str]) -> Vec<String> {
    let by_field = errors.field_errors();
    field_order
        .iter()
        .filter_map(|field| by_field.get(*field))
        .flat_map(|field_errors| field_errors.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => error.code.to_string(),
        })
        .collect()
}

/// Validate a contact form and build its insert record
pub fn validate_contact(payload: &ContactSubmission) -> Result<NewContactMessage, Vec<String>> {
    payload
        .validate()
        .map_err(|errors| messages_in_order(&errors, CONTACT_FIELD_ORDER))?;

    Ok(NewContactMessage {
        name: payload.name.trim().to_string(),
        email: payload.email.trim().to_lowercase(),
        subject: payload.subject.trim().to_string(),
        message: payload.message.trim().to_string(),
    })
}

/// Validate an admission application against `today` and build its insert record
pub fn validate_admission(
    payload: &AdmissionSubmission,
    today: NaiveDate,
) -> Result<NewAdmissionApplication, Vec<String>> {
    let mut errors = payload.validate().err().unwrap_or_else(ValidationErrors::new);
    if let Err(error) = rules::date_of_birth(&payload.date_of_birth, today) {
        errors.add("date_of_birth", error);
    }

    // Both parse once the rules pass; the match keeps that explicit.
    match (
        errors.errors().is_empty(),
        parse_date_of_birth(&payload.date_of_birth),
        normalize_choice(&payload.gender, GENDERS),
    ) {
        (true, Some(date_of_birth), Some(gender)) => Ok(NewAdmissionApplication {
            student_name: payload.student_name.trim().to_string(),
            date_of_birth,
            gender: gender.to_string(),
            parent_name: payload.parent_name.trim().to_string(),
            parent_email: payload.parent_email.trim().to_lowercase(),
            parent_phone: payload.parent_phone.trim().to_string(),
            address: payload.address.trim().to_string(),
            grade_applying_for: payload.grade_applying_for.trim().to_string(),
            previous_school: non_blank(payload.previous_school.as_deref()),
            additional_info: non_blank(payload.additional_info.as_deref()),
        }),
        _ => Err(messages_in_order(&errors, ADMISSION_FIELD_ORDER)),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
