//! Data store client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use gateway_core::{Error, Result};

/// Hosted data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Data API base URL
    pub base_url: String,
    /// Bearer token for the data API (optional)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tour detail cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Maximum cached tour entries
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_cache_ttl_secs() -> u64 {
    30
}

fn default_cache_capacity() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl StoreConfig {
    /// Reject an unusable base URL or zero timeout before serving.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| Error::internal(format!("store base_url does not parse: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::internal(format!(
                "store base_url scheme must be http or https, got `{}`",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::internal("store timeout_secs must be >= 1"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path joins.
    pub fn trimmed_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
