//! Alert delivery to the remote collection endpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::AlertEvent;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("alert delivery failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("alert endpoint returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// Delivery seam for alerts. At-most-once: callers log a failure and move
/// on; nothing is queued for retry.
#[async_trait]
pub trait ReportAlerts: Send + Sync {
    async fn report(&self, event: &AlertEvent) -> Result<(), DeliveryError>;
}

/// HTTP reporter posting to the `/log-alert` endpoint.
pub struct AlertReporter {
    client: reqwest::Client,
    base_url: String,
}

impl AlertReporter {
    /// `base_url` should be like `http://localhost:5000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ReportAlerts for AlertReporter {
    async fn report(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        let url = format!("{}/log-alert", self.base_url);

        let resp = self.client.post(&url).json(event).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(DeliveryError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
