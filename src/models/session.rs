use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MonitorStatus {
    Idle,
    Active,
    Terminated,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        MonitorStatus::Idle
    }
}

impl MonitorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MonitorStatus::Idle => "Idle",
            MonitorStatus::Active => "Active",
            MonitorStatus::Terminated => "Terminated",
        }
    }
}

/// One candidate's exam session, created only by a successful guard check.
///
/// Exclusively owned by its monitor loop for the session's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSession {
    pub id: String,
    pub candidate_id: String,
    pub started_at: DateTime<Utc>,
}

impl CandidateSession {
    pub fn new(candidate_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            candidate_id,
            started_at: Utc::now(),
        }
    }
}
