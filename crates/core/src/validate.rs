//! Format validation for inbound request fields.
//!
//! Rigid-format fields (slug, email, phone, date) get exact-format
//! checks here; free text is never rejected for its content, only
//! bounded and later sanitized.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{Error, Result};
use crate::inquiry::InquiryPayload;
use crate::limits::{
    AFF_TOKEN_PATTERN, MAX_INQUIRY_BODY_BYTES, MAX_SLUG_LEN, PHONE_PATTERN, SLUG_PATTERN,
    TRAVEL_DATE_PATTERN,
};

/// Compiled slug regex (lazy initialization).
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SLUG_PATTERN).expect("invalid slug pattern"));

/// Compiled phone regex.
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("invalid phone pattern"));

/// Compiled travel date shape regex.
static TRAVEL_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TRAVEL_DATE_PATTERN).expect("invalid travel date pattern"));

/// Compiled attribution token regex.
static AFF_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(AFF_TOKEN_PATTERN).expect("invalid attribution token pattern"));

/// Check a tour slug against the catalog slug format.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= MAX_SLUG_LEN && SLUG_REGEX.is_match(slug)
}

/// Check an attribution cookie value against the token format.
pub fn is_valid_aff_token(token: &str) -> bool {
    AFF_TOKEN_REGEX.is_match(token)
}

/// Validator hook: tour slug format.
pub fn validate_slug(slug: &str) -> std::result::Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        return Ok(());
    }
    let mut err = ValidationError::new("slug_format");
    err.message = Some("must be lowercase letters, digits, and hyphens".into());
    Err(err)
}

/// Validator hook: phone number format.
pub fn validate_phone(phone: &str) -> std::result::Result<(), ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if PHONE_REGEX.is_match(phone) && (6..=15).contains(&digits) {
        return Ok(());
    }
    let mut err = ValidationError::new("phone_format");
    err.message = Some("must be a phone number (6-15 digits, separators allowed)".into());
    Err(err)
}

/// Validator hook: travel date shape and calendar validity.
pub fn validate_travel_date(date: &str) -> std::result::Result<(), ValidationError> {
    if TRAVEL_DATE_REGEX.is_match(date) && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("travel_date");
    err.message = Some("must be a calendar date in YYYY-MM-DD format".into());
    Err(err)
}

/// Validates raw inquiry body size BEFORE deserialization.
///
/// Call this first to prevent allocation attacks from oversized payloads.
pub fn validate_inquiry_size(raw_bytes: &[u8]) -> Result<()> {
    if raw_bytes.len() > MAX_INQUIRY_BODY_BYTES {
        return Err(Error::validation(format!(
            "body {}KB exceeds {}KB limit",
            raw_bytes.len() / 1024,
            MAX_INQUIRY_BODY_BYTES / 1024
        )));
    }
    Ok(())
}

/// Validates an inquiry submission against its schema.
pub fn validate_inquiry(payload: &InquiryPayload) -> Result<()> {
    payload
        .validate()
        .map_err(|e| Error::validation_details("Validation failed", collect_details(&e)))
}

/// Flattens validator output into sorted per-field detail strings.
pub fn collect_details(errors: &ValidationErrors) -> Vec<String> {
    let mut details = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs {
            match &err.message {
                Some(msg) => details.push(format!("{field}: {msg}")),
                None => details.push(format!("{field}: {}", err.code)),
            }
        }
    }
    details.sort();
    details
}
