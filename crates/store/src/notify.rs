//! Admin notifications for new inquiries.
//!
//! Notification failure never fails the submission; callers log and
//! move on.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use gateway_core::{Error, InquiryRecord, Result};

use crate::InquiryNotifier;

/// Notification configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Webhook to POST each inquiry to, in addition to the log line.
    pub webhook_url: Option<String>,
}

/// Notification channel.
#[derive(Debug, Clone)]
pub enum NotificationChannel {
    /// Log only (default)
    Log,
    /// POST the inquiry record to a webhook
    Webhook { url: String },
}

/// Sends new-lead notifications over the configured channels.
pub struct Notifier {
    channels: Vec<NotificationChannel>,
    http: reqwest::Client,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self {
            channels: vec![NotificationChannel::Log],
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub fn with_channel(mut self, channel: NotificationChannel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        let notifier = Self::new();
        match &config.webhook_url {
            Some(url) => notifier.with_channel(NotificationChannel::Webhook { url: url.clone() }),
            None => notifier,
        }
    }
}

#[async_trait]
impl InquiryNotifier for Notifier {
    async fn notify_inquiry(&self, record: &InquiryRecord) -> Result<()> {
        let mut last_err = None;

        for channel in &self.channels {
            match channel {
                NotificationChannel::Log => {
                    info!(
                        inquiry_id = %record.id,
                        tour_slug = %record.tour_slug,
                        "New inquiry received"
                    );
                }
                NotificationChannel::Webhook { url } => {
                    let sent = self.http.post(url).json(record).send().await;
                    match sent {
                        Ok(response) if response.status().is_success() => {}
                        Ok(response) => {
                            warn!(url = %url, status = %response.status(), "inquiry webhook rejected");
                            last_err =
                                Some(Error::upstream(format!("webhook returned {}", response.status())));
                        }
                        Err(e) => {
                            warn!(url = %url, error = %e, "inquiry webhook failed");
                            last_err = Some(Error::upstream(format!("webhook unreachable: {e}")));
                        }
                    }
                }
            }
        }

        match last_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
