//! REST client for the hosted data API.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

use gateway_core::{ClickEvent, Error, InquiryRecord, Result, TourDetail};

use crate::config::StoreConfig;
use crate::{EventStore, TourCatalog};

/// Client for the hosted data API.
///
/// Reads the tour catalog and appends inquiry/click records. Each call
/// is a single request-response round trip; the store provides its own
/// durability guarantees.
#[derive(Clone)]
pub struct RestStore {
    config: StoreConfig,
    http: reqwest::Client,
}

impl RestStore {
    /// Creates a new data API client.
    pub fn new(config: StoreConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { config, http }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.trimmed_base())
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }

    /// Reachability probe against the data API health route.
    pub async fn ping(&self) -> Result<()> {
        let url = self.url("/health");
        let response = self
            .with_auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| Error::upstream(format!("data store unreachable: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::upstream(format!(
                "data store health returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn post_record<T: serde::Serialize>(&self, path: &str, what: &str, body: &T) -> Result<()> {
        let url = self.url(path);
        let response = self
            .with_auth(self.http.post(&url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "data store request failed");
                Error::upstream(format!("data store unreachable: {e}"))
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        warn!(url = %url, status = %status, body = %body, "data store rejected {what} write");
        if status.is_server_error() {
            Err(Error::upstream(format!("data store returned {status}")))
        } else {
            // A 4xx on our own record means this layer built it wrong.
            Err(Error::internal(format!(
                "data store rejected {what} write with {status}"
            )))
        }
    }
}

#[async_trait]
impl TourCatalog for RestStore {
    async fn tour_detail(&self, slug: &str) -> Result<Option<TourDetail>> {
        let url = self.url(&format!("/tours/{slug}"));
        debug!(url = %url, "fetching tour detail");

        let response = self
            .with_auth(self.http.get(&url))
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "data store request failed");
                Error::upstream(format!("data store unreachable: {e}"))
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let tour: TourDetail = response.json().await.map_err(|e| {
                    warn!(url = %url, error = %e, "tour detail response did not parse");
                    Error::internal(format!("invalid tour detail response: {e}"))
                })?;
                Ok(Some(tour))
            }
            status if status.is_server_error() => {
                Err(Error::upstream(format!("data store returned {status}")))
            }
            status => Err(Error::internal(format!("data store returned {status}"))),
        }
    }
}

#[async_trait]
impl EventStore for RestStore {
    async fn insert_inquiry(&self, record: &InquiryRecord) -> Result<()> {
        self.post_record("/inquiries", "inquiry", record).await
    }

    async fn insert_click(&self, event: &ClickEvent) -> Result<()> {
        self.post_record("/clicks", "click", event).await
    }
}
