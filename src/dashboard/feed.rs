//! Displayed alert list and per-candidate statistics.
//!
//! Each successful poll replaces the whole displayed list with the fetched
//! one (the retrieval endpoint returns the full chronological list, not a
//! diff); a failed poll leaves the previous list and stats untouched so the
//! dashboard keeps rendering the best data it has.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::AlertRecord;

#[derive(Debug, Error)]
pub enum FeedPollError {
    #[error("alert poll failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("alert endpoint returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// Derived per-candidate summary. Always a pure function of the current
/// record list; recomputed on every successful poll, never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStats {
    pub total: usize,
    /// Alert count per direction label, e.g. "Looking Left" -> 2.
    pub counts: HashMap<String, usize>,
    pub last_alert: AlertRecord,
}

/// What the proctor UI renders: records in server order plus grouped stats.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub records: Vec<AlertRecord>,
    pub stats: HashMap<String, CandidateStats>,
    pub last_success_at: Option<DateTime<Utc>>,
    pub poll_failures: u64,
}

/// Exclusively owned by one feed instance; mutated only by `apply`.
#[derive(Debug, Default)]
pub struct FeedState {
    records: Vec<AlertRecord>,
    stats: HashMap<String, CandidateStats>,
    last_success_at: Option<DateTime<Utc>>,
    poll_failures: u64,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one poll result into the displayed state.
    pub fn apply(&mut self, result: Result<Vec<AlertRecord>, FeedPollError>) {
        match result {
            Ok(records) => {
                self.stats = compute_stats(&records);
                self.records = records;
                self.last_success_at = Some(Utc::now());
            }
            Err(_) => {
                // Graceful degradation: stale data beats no data
                self.poll_failures += 1;
            }
        }
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            records: self.records.clone(),
            stats: self.stats.clone(),
            last_success_at: self.last_success_at,
            poll_failures: self.poll_failures,
        }
    }
}

/// Group records by candidate, preserving server order within each group so
/// "last alert" is the most recent one the store returned.
fn compute_stats(records: &[AlertRecord]) -> HashMap<String, CandidateStats> {
    let mut stats: HashMap<String, CandidateStats> = HashMap::new();

    for record in records {
        match stats.get_mut(&record.student_id) {
            Some(entry) => {
                entry.total += 1;
                *entry.counts.entry(record.direction.clone()).or_insert(0) += 1;
                entry.last_alert = record.clone();
            }
            None => {
                let mut counts = HashMap::new();
                counts.insert(record.direction.clone(), 1);
                stats.insert(
                    record.student_id.clone(),
                    CandidateStats {
                        total: 1,
                        counts,
                        last_alert: record.clone(),
                    },
                );
            }
        }
    }

    stats
}
