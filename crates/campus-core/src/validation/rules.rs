//! `custom` rules referenced by the payload derives
//!
//! Each rule owns its client-facing message so a failed field maps to exactly
//! one line of the response's `details`.

use std::borrow::Cow;

use chrono::NaiveDate;
use validator::ValidationError;

use super::fields::{
    is_age_within, is_valid_email, is_valid_phone, normalize_choice, optional_text_within,
    text_length_within,
};

pub const GENDERS: &[&str] = &["male", "female", "other"];

pub const MIN_AGE_YEARS: i64 = 3;
pub const MAX_AGE_YEARS: i64 = 25;

fn violation(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn require(passed: bool, code: &'static str, message: &'static str) -> Result<(), ValidationError> {
    if passed {
        Ok(())
    } else {
        Err(violation(code, message))
    }
}

fn trimmed_length(
    value: &str,
    min: usize,
    max: usize,
    message: &'static str,
) -> Result<(), ValidationError> {
    require(text_length_within(value, min, max), "length", message)
}

pub fn contact_name(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 2, 100, "Name must be between 2 and 100 characters")
}

pub fn contact_email(value: &str) -> Result<(), ValidationError> {
    require(is_valid_email(value), "email", "Please enter a valid email address")
}

pub fn contact_subject(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 3, 200, "Subject must be between 3 and 200 characters")
}

pub fn contact_message(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 10, 2000, "Message must be between 10 and 2000 characters")
}

pub fn student_name(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 2, 100, "Student name must be between 2 and 100 characters")
}

/// Parseable date and an age in `[MIN_AGE_YEARS, MAX_AGE_YEARS]` on `today`.
/// One message covers both failures.
pub fn date_of_birth(value: &str, today: NaiveDate) -> Result<(), ValidationError> {
    if is_age_within(value, today, MIN_AGE_YEARS, MAX_AGE_YEARS) {
        return Ok(());
    }
    Err(violation(
        "age",
        format!(
            "Age must be between {} and {} years",
            MIN_AGE_YEARS, MAX_AGE_YEARS
        ),
    ))
}

pub fn gender(value: &str) -> Result<(), ValidationError> {
    require(
        normalize_choice(value, GENDERS).is_some(),
        "choice",
        "Please select a valid gender",
    )
}

pub fn parent_name(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 2, 100, "Parent name must be between 2 and 100 characters")
}

pub fn parent_email(value: &str) -> Result<(), ValidationError> {
    require(
        is_valid_email(value),
        "email",
        "Please enter a valid parent email address",
    )
}

pub fn parent_phone(value: &str) -> Result<(), ValidationError> {
    require(is_valid_phone(value), "phone", "Please enter a valid phone number")
}

pub fn address(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 10, 500, "Address must be between 10 and 500 characters")
}

pub fn grade(value: &str) -> Result<(), ValidationError> {
    trimmed_length(value, 1, 50, "Please select a grade")
}

pub fn previous_school(value: &str) -> Result<(), ValidationError> {
    require(
        optional_text_within(Some(value), 200),
        "length",
        "Previous school name must be at most 200 characters",
    )
}

pub fn additional_info(value: &str) -> Result<(), ValidationError> {
    require(
        optional_text_within(Some(value), 2000),
        "length",
        "Additional information must be at most 2000 characters",
    )
}
