//! Field-level validation rules
//!
//! Every rule is a pure predicate over the raw value. The `custom` rules in
//! [`super::rules`] wrap them with client-facing messages.

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length for email addresses (255 characters)
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Phone length bounds, counted on the trimmed value including any leading `+`.
/// The upper bound matches the `parent_phone` column width.
pub const MIN_PHONE_LENGTH: usize = 7;
pub const MAX_PHONE_LENGTH: usize = 20;

const DAYS_PER_YEAR: f64 = 365.25;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s()\-]+$").expect("phone pattern compiles"));

/// `local@domain.tld` shape and at most [`MAX_EMAIL_LENGTH`] characters
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    email.chars().count() <= MAX_EMAIL_LENGTH && EMAIL_PATTERN.is_match(email)
}

/// Digits, spaces, parentheses and hyphens with an optional leading `+`,
/// [`MIN_PHONE_LENGTH`] to [`MAX_PHONE_LENGTH`] characters in total
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    (MIN_PHONE_LENGTH..=MAX_PHONE_LENGTH).contains(&phone.chars().count())
        && PHONE_CHARSET.is_match(phone)
}

/// Trimmed character count within `[min, max]`
pub fn text_length_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    len >= min && len <= max
}

/// Absent or blank values always pass; present values must not exceed `max`
pub fn optional_text_within(value: Option<&str>, max: usize) -> bool {
    match value {
        Some(v) => v.trim().chars().count() <= max,
        None => true,
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp
pub fn parse_date_of_birth(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Whole years between `dob` and `today`, counting a year as 365.25 days
pub fn age_in_years(dob: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - dob).num_days() as f64;
    (days / DAYS_PER_YEAR).floor() as i64
}

/// Combined check: the date parses and the age falls in `[min, max]`
pub fn is_age_within(raw_dob: &str, today: NaiveDate, min: i64, max: i64) -> bool {
    parse_date_of_birth(raw_dob)
        .map(|dob| age_in_years(dob, today))
        .is_some_and(|age| age >= min && age <= max)
}

/// Case-normalized membership in a fixed allow-list, returning the canonical entry
pub fn normalize_choice(value: &str, allowed: &[&'static str]) -> Option<&'static str> {
    let normalized = value.trim().to_lowercase();
    allowed.iter().copied().find(|choice| *choice == normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn dob_days_ago(days: i64) -> String {
        (today() - Duration::days(days)).format("%Y-%m-%d").to_string()
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("  parent.name+school@example.org "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.co"));
    }

    #[test]
    fn test_email_length_bound() {
        let too_long = format!("{}@b.co", "x".repeat(256));
        assert!(!is_valid_email(&too_long));

        let at_limit = format!("{}@b.co", "x".repeat(MAX_EMAIL_LENGTH - 5));
        assert_eq!(at_limit.len(), MAX_EMAIL_LENGTH);
        assert!(is_valid_email(&at_limit));
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("+1 (555) 123-4567"));
        assert!(is_valid_phone("0123456"));
        assert!(!is_valid_phone("123456"));
        assert!(!is_valid_phone("555-CALL-NOW"));
        assert!(!is_valid_phone("1+5551234567"));
        assert!(!is_valid_phone(&"1".repeat(21)));
    }

    #[test]
    fn test_phone_length_counts_leading_plus() {
        assert!(is_valid_phone(&format!("+{}", "1".repeat(19))));
        assert!(!is_valid_phone(&format!("+{}", "1".repeat(20))));
        assert!(is_valid_phone(&format!("+{}", "1".repeat(6))));
        assert!(!is_valid_phone("+12345"));
        // surrounding whitespace is not counted
        assert!(is_valid_phone(&format!("  {}  ", "1".repeat(20))));
    }

    #[test]
    fn test_text_length_is_inclusive_and_trimmed() {
        assert!(text_length_within("Jo", 2, 100));
        assert!(!text_length_within("J", 2, 100));
        assert!(!text_length_within("  J  ", 2, 100));
        assert!(text_length_within(&"a".repeat(100), 2, 100));
        assert!(!text_length_within(&"a".repeat(101), 2, 100));
        // character count, not bytes
        assert!(text_length_within("Zoë", 3, 3));
    }

    #[test]
    fn test_optional_text() {
        assert!(optional_text_within(None, 10));
        assert!(optional_text_within(Some(""), 10));
        assert!(optional_text_within(Some("0123456789"), 10));
        assert!(!optional_text_within(Some("0123456789a"), 10));
    }

    #[test]
    fn test_parse_date_of_birth_formats() {
        assert_eq!(
            parse_date_of_birth("2015-04-01"),
            NaiveDate::from_ymd_opt(2015, 4, 1)
        );
        assert_eq!(
            parse_date_of_birth("2015-04-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2015, 4, 1)
        );
        assert!(parse_date_of_birth("2015-02-30").is_none());
        assert!(parse_date_of_birth("yesterday").is_none());
        assert!(parse_date_of_birth("").is_none());
    }

    #[test]
    fn test_age_bounds_are_inclusive() {
        // 1096 days is just over three years of 365.25 days
        assert!(is_age_within(&dob_days_ago(1096), today(), 3, 25));
        assert!(!is_age_within(&dob_days_ago(1095), today(), 3, 25));

        let twenty_five = (25.0 * DAYS_PER_YEAR) as i64 + 1;
        assert!(is_age_within(&dob_days_ago(twenty_five), today(), 3, 25));

        let twenty_six = (26.0 * DAYS_PER_YEAR) as i64 + 1;
        assert!(!is_age_within(&dob_days_ago(twenty_six), today(), 3, 25));
    }

    #[test]
    fn test_age_rejects_future_and_malformed_dates() {
        assert!(!is_age_within("2030-01-01", today(), 3, 25));
        assert!(!is_age_within("01/04/2015", today(), 3, 25));
    }

    #[test]
    fn test_normalize_choice() {
        let allowed = &["male", "female", "other"];
        assert_eq!(normalize_choice(" Female ", allowed), Some("female"));
        assert_eq!(normalize_choice("OTHER", allowed), Some("other"));
        assert_eq!(normalize_choice("unknown", allowed), None);
        assert_eq!(normalize_choice("", allowed), None);
    }
}
