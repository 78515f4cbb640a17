use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// One classification result for one tick. Consumed immediately by the
/// anomaly check; never retained.
#[derive(Debug, Clone)]
pub struct DirectionSample {
    pub candidate_id: String,
    pub direction: Direction,
    pub observed_at: DateTime<Utc>,
}

/// Head-pose angles the classification service returns alongside the label.
/// Carried into the alert so the proctor sees how far off-center the
/// candidate was looking.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AlertDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
}

impl AlertDetails {
    pub fn is_empty(&self) -> bool {
        self.yaw.is_none() && self.pitch.is_none() && self.roll.is_none()
    }
}

/// An anomaly observed during a session, in the ingestion endpoint's wire
/// shape. Immutable once created; the reporter owns it until the remote
/// store acknowledges (or the delivery is dropped).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertEvent {
    pub student_id: String,
    pub direction: String,
    pub alert_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AlertDetails>,
}

impl AlertEvent {
    /// Build an alert from an anomalous sample. Callers must have already
    /// checked `sample.direction.is_anomalous()`.
    pub fn from_sample(sample: &DirectionSample, details: Option<AlertDetails>) -> Self {
        Self {
            student_id: sample.candidate_id.clone(),
            direction: sample.direction.as_label().to_string(),
            alert_time: sample.observed_at,
            details,
        }
    }
}

/// A server-confirmed alert as returned by the retrieval endpoint. Same
/// wire shape as [`AlertEvent`]; kept separate because the feed treats
/// these as opaque, append-only records it never mutates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRecord {
    pub student_id: String,
    pub direction: String,
    pub alert_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AlertDetails>,
}
