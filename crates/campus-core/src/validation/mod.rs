//! Validation modules

pub mod fields;
pub mod honeypot;
pub mod rules;
pub mod submission;

pub use fields::{
    age_in_years, is_age_within, is_valid_email, is_valid_phone, normalize_choice,
    optional_text_within, parse_date_of_birth, text_length_within, MAX_EMAIL_LENGTH,
    MAX_PHONE_LENGTH, MIN_PHONE_LENGTH,
};
pub use honeypot::is_truthy;
pub use rules::GENDERS;
pub use submission::{validate_admission, validate_contact};
