//! HTTP client for the external head-pose classification service.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{AlertDetails, Direction, DirectionSample};

use super::frame::Frame;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("classification request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classification service returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// One tick's classification result: the sample plus whatever head-pose
/// angles the service reported.
#[derive(Debug, Clone)]
pub struct Classification {
    pub sample: DirectionSample,
    pub details: Option<AlertDetails>,
}

/// Classification seam. One external call per invocation, no retry here —
/// the monitor loop's failure handling owns what happens on error.
#[async_trait]
pub trait Classify: Send + Sync {
    async fn classify(
        &self,
        candidate_id: &str,
        frame: Frame,
    ) -> Result<Classification, ClassifyError>;
}

#[derive(Deserialize)]
struct DetectHeadResponse {
    direction: String,
    #[serde(default)]
    yaw: Option<f64>,
    #[serde(default)]
    pitch: Option<f64>,
    #[serde(default)]
    roll: Option<f64>,
}

/// HTTP client for the `/detect-head` endpoint.
pub struct ClassificationClient {
    client: reqwest::Client,
    base_url: String,
}

impl ClassificationClient {
    /// `base_url` should be like `http://localhost:5000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Classify for ClassificationClient {
    async fn classify(
        &self,
        candidate_id: &str,
        frame: Frame,
    ) -> Result<Classification, ClassifyError> {
        let url = format!("{}/detect-head", self.base_url);

        // The frame is moved into the request body here; nothing retains it.
        let part = reqwest::multipart::Part::bytes(frame.into_bytes())
            .file_name("frame.jpg")
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = self.client.post(&url).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClassifyError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: DetectHeadResponse = resp.json().await?;
        let details = AlertDetails {
            yaw: parsed.yaw,
            pitch: parsed.pitch,
            roll: parsed.roll,
        };

        Ok(Classification {
            sample: DirectionSample {
                candidate_id: candidate_id.to_string(),
                direction: Direction::from_label(&parsed.direction),
                observed_at: Utc::now(),
            },
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
        })
    }
}
