//! Inquiry submission types: the inbound payload and the persisted record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::validate::{validate_phone, validate_slug, validate_travel_date};

/// Inbound inquiry submission, exactly as posted by the booking form.
///
/// Derive attributes hold the field limits as literals; `limits.rs`
/// documents the same values. Keep both in sync when modifying.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InquiryPayload {
    #[serde(rename = "tourId")]
    pub tour_id: Uuid,

    #[serde(rename = "tourSlug")]
    #[validate(
        length(min = 1, max = 100, message = "must be 1-100 characters"),
        custom(function = "validate_slug")
    )]
    pub tour_slug: String,

    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 254, message = "must be at most 254 characters")
    )]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub message: String,

    #[serde(rename = "travelDate")]
    #[validate(custom(function = "validate_travel_date"))]
    pub travel_date: Option<String>,

    #[serde(rename = "groupSize")]
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub group_size: Option<u32>,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub utm_source: Option<String>,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub utm_medium: Option<String>,

    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub utm_campaign: Option<String>,

    /// Cookie id echoed by non-browser clients. Browser submissions
    /// carry the `_aff` cookie instead, which wins when both exist.
    pub affiliate_cookie: Option<String>,
}

impl InquiryPayload {
    /// Parsed travel date. Only meaningful after validation has
    /// passed; malformed input reads as absent.
    pub fn travel_date_parsed(&self) -> Option<NaiveDate> {
        self.travel_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Persisted inquiry, written to the store once the pipeline clears.
///
/// Free-text fields hold sanitized values only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryRecord {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub tour_slug: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub travel_date: Option<NaiveDate>,
    pub group_size: Option<u32>,
    #[serde(rename = "utm_source")]
    pub utm_source: Option<String>,
    #[serde(rename = "utm_medium")]
    pub utm_medium: Option<String>,
    #[serde(rename = "utm_campaign")]
    pub utm_campaign: Option<String>,
    /// `_aff` token linking this lead back to a redirect click.
    pub affiliate_cookie_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
