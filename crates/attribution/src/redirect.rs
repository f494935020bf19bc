//! Attributed redirect URL construction.
//!
//! Merges UTM parameters into a tour's stored affiliate URL.
//! Precedence per key: an explicit value from the inbound query wins,
//! then a value already on the affiliate URL, then the configured
//! default. No key is ever duplicated.

use serde::{Deserialize, Serialize};
use url::Url;

use gateway_core::{Error, Result};

/// The UTM keys that always appear on an attributed URL, in output
/// order.
const CANONICAL_UTM_KEYS: [&str; 4] = ["utm_source", "utm_medium", "utm_campaign", "utm_content"];

/// UTM fallbacks applied when neither the inbound query nor the
/// affiliate URL names a value. Validated once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UtmDefaults {
    /// `utm_source` fallback; the site's own name.
    pub source: String,
    pub medium: String,
    pub campaign: String,
}

impl Default for UtmDefaults {
    fn default() -> Self {
        Self {
            source: "tour-site".to_string(),
            medium: "affiliate".to_string(),
            campaign: "tour-redirect".to_string(),
        }
    }
}

impl UtmDefaults {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("source", &self.source),
            ("medium", &self.medium),
            ("campaign", &self.campaign),
        ] {
            if value.trim().is_empty() {
                return Err(Error::internal(format!("utm default `{name}` must not be empty")));
            }
        }
        Ok(())
    }

    /// Fallback for one canonical key. `utm_content` defaults to the
    /// tour slug, so it is computed, not configured.
    fn fallback<'a>(&'a self, key: &str, slug: &'a str) -> &'a str {
        match key {
            "utm_source" => &self.source,
            "utm_medium" => &self.medium,
            "utm_campaign" => &self.campaign,
            _ => slug,
        }
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.as_str())
}

/// Build the outbound affiliate URL for one redirect.
///
/// `explicit` is the inbound request's query string, in order; only
/// its `utm_*` pairs participate in the merge.
pub fn build_redirect_url(
    base_affiliate_url: &str,
    slug: &str,
    explicit: &[(String, String)],
    defaults: &UtmDefaults,
) -> Result<String> {
    let mut url = Url::parse(base_affiliate_url).map_err(|e| {
        Error::internal(format!("stored affiliate URL for `{slug}` does not parse: {e}"))
    })?;

    let existing: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    // Non-UTM keys on the affiliate URL pass through untouched, in
    // their original order.
    let passthrough: Vec<&(String, String)> = existing
        .iter()
        .filter(|(k, _)| !k.starts_with("utm_"))
        .collect();

    let mut merged: Vec<(&str, &str)> = CANONICAL_UTM_KEYS
        .iter()
        .map(|&key| {
            let value = lookup(explicit, key)
                .or_else(|| lookup(&existing, key))
                .unwrap_or_else(|| defaults.fallback(key, slug));
            (key, value)
        })
        .collect();

    // Extra utm_* keys (utm_term and friends): explicit first, then
    // leftovers from the affiliate URL, still one value per key.
    for (k, v) in explicit.iter().chain(existing.iter()) {
        if k.starts_with("utm_")
            && !v.is_empty()
            && !merged.iter().any(|(mk, _)| mk == k)
        {
            merged.push((k.as_str(), v.as_str()));
        }
    }

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        for (k, v) in &passthrough {
            query.append_pair(k, v);
        }
        for (k, v) in &merged {
            query.append_pair(k, v);
        }
    }

    Ok(url.into())
}
