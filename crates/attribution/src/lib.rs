//! Affiliate attribution: durable `_aff` client identity and UTM
//! merge for outbound redirect URLs. Pure functions over request
//! data; click persistence lives with the store client.

pub mod cookie;
pub mod redirect;

pub use cookie::{ensure_token, from_cookie_header, AffToken, COOKIE_NAME, MAX_AGE_SECS};
pub use redirect::{build_redirect_url, UtmDefaults};
