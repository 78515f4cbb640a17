use anyhow::{anyhow, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::classify::{Classify, FrameSource};
use crate::models::{AlertEvent, CandidateSession, Direction, DirectionSample};
use crate::reporter::ReportAlerts;

// Set to false to silence per-tick logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Timing policy for one monitored session.
#[derive(Debug, Clone, Copy)]
pub struct MonitorPolicy {
    pub capture_interval: Duration,
    pub classify_timeout: Duration,
}

/// External collaborators the loop drives each tick.
pub struct MonitorDeps {
    pub frames: Arc<dyn FrameSource>,
    pub classifier: Arc<dyn Classify>,
    pub reporter: Arc<dyn ReportAlerts>,
}

/// Drives one candidate's capture-classify-evaluate cycle until the session
/// is terminated.
///
/// Every tick runs at most one classification round trip; a tick that fails
/// or times out is treated as an `Unknown` direction and never alerts, and
/// the next tick proceeds on schedule regardless. Cancellation abandons the
/// in-flight round trip without emitting anything.
pub async fn monitor_loop(
    session: CandidateSession,
    deps: MonitorDeps,
    policy: MonitorPolicy,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(policy.capture_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut tick_count: u64 = 0;
    let mut alert_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tick_count += 1;
                let fut = perform_tick(&session, &deps, &cancel_token, &mut alert_count);

                match tokio::time::timeout(policy.classify_timeout, fut).await {
                    Ok(Ok(direction)) => {
                        log_info!(
                            "tick {} session {}: {}",
                            tick_count, session.id, direction.as_label()
                        );
                    }
                    // Fail-open: a failed tick is an Unknown direction, not an alert
                    Ok(Err(err)) => log_warn!(
                        "tick {} session {} failed, treating as Unknown: {err:?}",
                        tick_count, session.id
                    ),
                    Err(_) => log_warn!(
                        "tick {} session {} timed out (> {:?}), treating as Unknown",
                        tick_count, session.id, policy.classify_timeout
                    ),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!(
                    "monitor loop for session {} shutting down after {} ticks, {} alerts",
                    session.id, tick_count, alert_count
                );
                break;
            }
        }
    }
}

async fn perform_tick(
    session: &CandidateSession,
    deps: &MonitorDeps,
    cancel_token: &CancellationToken,
    alert_count: &mut u64,
) -> Result<Direction> {
    let frame = deps
        .frames
        .next_frame()
        .await
        .map_err(|err| anyhow!("frame capture failed: {err}"))?;

    let classification = deps
        .classifier
        .classify(&session.candidate_id, frame)
        .await
        .map_err(|err| anyhow!("classification failed: {err}"))?;

    let sample = DirectionSample {
        observed_at: Utc::now(),
        ..classification.sample
    };

    // A session terminated mid-round-trip must not emit its result.
    if cancel_token.is_cancelled() {
        return Ok(sample.direction);
    }

    if sample.direction.is_anomalous() {
        *alert_count += 1;
        let event = AlertEvent::from_sample(&sample, classification.details);
        let reporter = Arc::clone(&deps.reporter);

        // At-most-once delivery: a failed report is logged and dropped, and
        // the loop never waits on it.
        tokio::spawn(async move {
            if let Err(err) = reporter.report(&event).await {
                log_warn!(
                    "alert delivery failed for {} ({}): {err}",
                    event.student_id, event.direction
                );
            }
        });
    }

    Ok(sample.direction)
}
