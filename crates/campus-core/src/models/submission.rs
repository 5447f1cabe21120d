//! Form payloads accepted by the submission endpoints and the rows they become.
//!
//! Payload structs are the structural schema: a body that does not deserialize
//! into them is rejected before any field rule runs. Required text fields default
//! to empty so that a missing field is reported by the field validators together
//! with every other problem instead of failing on its own.
//!
//! Field rules are declared with `validator`; lengths are counted on the trimmed
//! value, so every rule is a `custom` function from [`crate::validation::rules`].
//! The date of birth is checked against the current date outside the derive.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::validation::honeypot::is_truthy;

/// Body of `POST /submit-contact`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactSubmission {
    #[validate(custom(function = "crate::validation::rules::contact_name"))]
    pub name: String,
    #[validate(custom(function = "crate::validation::rules::contact_email"))]
    pub email: String,
    #[validate(custom(function = "crate::validation::rules::contact_subject"))]
    pub subject: String,
    #[validate(custom(function = "crate::validation::rules::contact_message"))]
    pub message: String,
    pub honeypot: Option<Value>,
}

impl ContactSubmission {
    pub fn is_bot(&self) -> bool {
        self.honeypot.as_ref().is_some_and(is_truthy)
    }
}

/// Body of `POST /submit-admission`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct AdmissionSubmission {
    #[validate(custom(function = "crate::validation::rules::student_name"))]
    pub student_name: String,
    pub date_of_birth: String,
    #[validate(custom(function = "crate::validation::rules::gender"))]
    pub gender: String,
    #[validate(custom(function = "crate::validation::rules::parent_name"))]
    pub parent_name: String,
    #[validate(custom(function = "crate::validation::rules::parent_email"))]
    pub parent_email: String,
    #[validate(custom(function = "crate::validation::rules::parent_phone"))]
    pub parent_phone: String,
    #[validate(custom(function = "crate::validation::rules::address"))]
    pub address: String,
    #[validate(custom(function = "crate::validation::rules::grade"))]
    pub grade_applying_for: String,
    #[validate(custom(function = "crate::validation::rules::previous_school"))]
    pub previous_school: Option<String>,
    #[validate(custom(function = "crate::validation::rules::additional_info"))]
    pub additional_info: Option<String>,
    pub honeypot: Option<Value>,
}

impl AdmissionSubmission {
    pub fn is_bot(&self) -> bool {
        self.honeypot.as_ref().is_some_and(is_truthy)
    }
}

/// Normalized `contact_messages` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Normalized `admission_applications` row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAdmissionApplication {
    pub student_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub parent_name: String,
    pub parent_email: String,
    pub parent_phone: String,
    pub address: String,
    pub grade_applying_for: String,
    pub previous_school: Option<String>,
    pub additional_info: Option<String>,
}
