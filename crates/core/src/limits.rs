//! Size limits and format patterns for inbound requests.
//!
//! These bounds keep a single request's working set small and
//! predictable; everything user-controlled is capped before it is
//! scanned, sanitized, or persisted.
//!
//! # Usage Note
//!
//! The `#[validate]` derive macro requires literal values in
//! attributes, so field limits are duplicated there. Keep both in
//! sync when modifying.

// === Request Limits ===

/// Maximum inquiry body size in bytes (64KB).
///
/// The largest legitimate submission (5000-char message plus every
/// optional field) is well under 16KB even with multi-byte text.
pub const MAX_INQUIRY_BODY_BYTES: usize = 64 * 1024;

// === String Field Limits (chars) ===

/// Tour slug max length.
/// Longest real slug in the catalog is 47 chars.
pub const MAX_SLUG_LEN: usize = 100;

/// Visitor name max length.
pub const MAX_NAME_LEN: usize = 200;

/// Email max length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone number max length.
/// E.164 is 15 digits; allow separators and extensions.
pub const MAX_PHONE_LEN: usize = 32;

/// Free-text message max length.
pub const MAX_MESSAGE_LEN: usize = 5000;

/// UTM parameter value max length.
pub const MAX_UTM_LEN: usize = 255;

/// User agent string max length.
/// Browser UAs: 100-300 typical, 500+ with extensions.
pub const MAX_USER_AGENT_LEN: usize = 512;

// === Group Size Bounds ===

/// Largest party a tour operator will take.
pub const MAX_GROUP_SIZE: u32 = 100;

// === Format Patterns ===

/// Tour slug: lowercase alphanumeric segments joined by single hyphens.
pub const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Phone: optional leading `+`, then digits and common separators.
/// Digit count is checked separately; the shape alone admits junk
/// like all-spaces.
pub const PHONE_PATTERN: &str = r"^\+?[0-9 ().\-]{6,31}$";

/// Travel date shape: zero-padded YYYY-MM-DD. Calendar validity is
/// checked separately.
pub const TRAVEL_DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// Attribution cookie token: 32 lowercase hex chars (a v4 UUID with
/// the hyphens stripped).
pub const AFF_TOKEN_PATTERN: &str = r"^[0-9a-f]{32}$";
