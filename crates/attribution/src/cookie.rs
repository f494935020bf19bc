//! The `_aff` attribution cookie.
//!
//! A long-lived opaque token joining a redirect click to a later
//! inquiry. Issued once per browser; a presented well-formed token is
//! reused unconditionally and never rotated by the server.

use uuid::Uuid;

use gateway_core::validate::is_valid_aff_token;

/// Cookie name on the wire.
pub const COOKIE_NAME: &str = "_aff";

/// 90 days.
pub const MAX_AGE_SECS: u64 = 7_776_000;

/// Attribution identity resolved for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffToken {
    token: String,
    is_new: bool,
}

impl AffToken {
    /// The opaque token value.
    pub fn value(&self) -> &str {
        &self.token
    }

    /// Whether this request minted the token.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// `Set-Cookie` header value. Only new tokens are set; an
    /// existing identity is never overwritten.
    pub fn set_cookie(&self) -> Option<String> {
        self.is_new.then(|| {
            format!(
                "{COOKIE_NAME}={}; HttpOnly; Secure; SameSite=Lax; Max-Age={MAX_AGE_SECS}; Path=/",
                self.token
            )
        })
    }
}

/// Reuse a presented well-formed token, otherwise mint a fresh one.
///
/// A malformed value reads as absent: attacker-shaped junk is never
/// adopted as a join key, the client simply gets a new identity. A v4
/// UUID carries 122 random bits, collision-proof at site scale.
pub fn ensure_token(presented: Option<&str>) -> AffToken {
    match presented {
        Some(token) if is_valid_aff_token(token) => AffToken {
            token: token.to_string(),
            is_new: false,
        },
        _ => AffToken {
            token: Uuid::new_v4().simple().to_string(),
            is_new: true,
        },
    }
}

/// Pull the `_aff` value out of a raw `Cookie` header.
pub fn from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == COOKIE_NAME).then(|| value.trim())
    })
}
