//! Tour detail cache.

use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use gateway_core::{Result, TourDetail};

use crate::TourCatalog;

/// Read-through cache in front of a tour catalog.
///
/// Unknown slugs are cached too, so a flood of bad slugs hammers this
/// process instead of the data API. Store errors are never cached.
pub struct CachedCatalog {
    inner: Arc<dyn TourCatalog>,
    cache: Cache<String, Option<TourDetail>>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn TourCatalog>, ttl: Duration, max_capacity: u64) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }
}

#[async_trait]
impl TourCatalog for CachedCatalog {
    async fn tour_detail(&self, slug: &str) -> Result<Option<TourDetail>> {
        if let Some(cached) = self.cache.get(slug).await {
            debug!(slug = %slug, "tour cache hit");
            return Ok(cached);
        }

        let fetched = self.inner.tour_detail(slug).await?;
        self.cache.insert(slug.to_string(), fetched.clone()).await;
        Ok(fetched)
    }
}
