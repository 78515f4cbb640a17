//! End-to-end session scenarios: guard check, a monitored session driving
//! real HTTP clients against a mock backend, and the dashboard feed
//! summarizing what landed in the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use proctorwatch::classify::{CaptureError, ClassificationClient, Frame, FrameSource};
use proctorwatch::dashboard::{AlertFetcher, FeedController};
use proctorwatch::guard::{start_session, GuardError, SessionContext};
use proctorwatch::monitor::{MonitorController, MonitorDeps, MonitorPolicy};
use proctorwatch::reporter::AlertReporter;

struct StaticFrames;

#[async_trait]
impl FrameSource for StaticFrames {
    async fn next_frame(&self) -> Result<Frame, CaptureError> {
        Ok(Frame::new(vec![0xff, 0xd8, 0xff, 0xe0]))
    }
}

fn fast_policy() -> MonitorPolicy {
    MonitorPolicy {
        capture_interval: Duration::from_millis(50),
        classify_timeout: Duration::from_secs(2),
    }
}

fn deps_for(server: &MockServer) -> MonitorDeps {
    MonitorDeps {
        frames: Arc::new(StaticFrames),
        classifier: Arc::new(ClassificationClient::new(server.uri())),
        reporter: Arc::new(AlertReporter::new(server.uri())),
    }
}

async fn logged_alerts(server: &MockServer) -> Vec<serde_json::Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/log-alert")
        .map(|request| request.body_json().unwrap())
        .collect()
}

#[tokio::test]
async fn unauthenticated_candidate_never_monitors() {
    let ctx = SessionContext::default();
    assert_eq!(start_session(&ctx).unwrap_err(), GuardError::Unauthenticated);
}

#[tokio::test]
async fn forward_looking_candidate_raises_no_alerts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-head"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "direction": "Looking Forward" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/log-alert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let session = start_session(&SessionContext::for_candidate("TEST001")).unwrap();
    let mut controller = MonitorController::new();
    controller.start(session, deps_for(&server), fast_policy()).unwrap();

    tokio::time::sleep(Duration::from_millis(220)).await;
    controller.stop().await.unwrap();

    assert!(logged_alerts(&server).await.is_empty());
}

#[tokio::test]
async fn left_looking_candidate_alerts_every_tick() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/detect-head"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "direction": "Looking Left",
            "yaw": -35.2
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/log-alert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let session = start_session(&SessionContext::for_candidate("TEST002")).unwrap();
    let mut controller = MonitorController::new();
    controller.start(session, deps_for(&server), fast_policy()).unwrap();

    tokio::time::sleep(Duration::from_millis(220)).await;
    controller.stop().await.unwrap();
    // Let any spawned report task flush before inspecting the server
    tokio::time::sleep(Duration::from_millis(50)).await;

    let alerts = logged_alerts(&server).await;
    assert!(
        alerts.len() >= 2,
        "every anomalous tick reports, got {}",
        alerts.len()
    );
    for alert in &alerts {
        assert_eq!(alert["student_id"], "TEST002");
        assert_eq!(alert["direction"], "Looking Left");
        assert_eq!(alert["details"]["yaw"], -35.2);
    }
    assert_ne!(
        alerts[0]["alert_time"], alerts[1]["alert_time"],
        "alerts carry independent per-tick timestamps"
    );
}

#[tokio::test]
async fn classification_outage_keeps_session_alive() {
    let server = MockServer::start().await;
    // Two failures, then the service recovers with an anomaly
    Mock::given(method("POST"))
        .and(path("/detect-head"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/detect-head"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "direction": "Looking Right" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/log-alert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let session = start_session(&SessionContext::for_candidate("TEST003")).unwrap();
    let mut controller = MonitorController::new();
    controller.start(session, deps_for(&server), fast_policy()).unwrap();

    tokio::time::sleep(Duration::from_millis(300)).await;
    controller.stop().await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let alerts = logged_alerts(&server).await;
    assert!(
        !alerts.is_empty(),
        "loop survived the outage and alerted after recovery"
    );
    assert_eq!(alerts[0]["direction"], "Looking Right");
}

#[tokio::test]
async fn dashboard_summarizes_store_contents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "student_id": "TEST002",
                "direction": "Looking Left",
                "alert_time": "2024-01-01T12:00:00Z"
            },
            {
                "student_id": "TEST002",
                "direction": "Looking Left",
                "alert_time": "2024-01-01T12:00:05Z"
            }
        ])))
        .mount(&server)
        .await;

    let controller = FeedController::new(
        Arc::new(AlertFetcher::new(server.uri())),
        Duration::from_secs(5),
    );
    controller.poll_once().await;

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.records.len(), 2);
    let stats = &snapshot.stats["TEST002"];
    assert_eq!(stats.total, 2);
    assert_eq!(stats.counts["Looking Left"], 2);
    assert_eq!(
        stats.last_alert.alert_time.to_rfc3339(),
        "2024-01-01T12:00:05+00:00"
    );
}

#[tokio::test]
async fn dashboard_keeps_stale_data_through_an_outage() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "student_id": "TEST001",
                "direction": "Looking Left",
                "alert_time": "2024-01-01T12:00:00Z"
            }
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/alerts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;

    let controller = FeedController::new(
        Arc::new(AlertFetcher::new(server.uri())),
        Duration::from_secs(5),
    );

    controller.poll_once().await;
    let healthy = controller.snapshot().await;
    assert_eq!(healthy.records.len(), 1);

    controller.poll_once().await;
    let degraded = controller.snapshot().await;
    assert_eq!(degraded.records, healthy.records, "previous list still rendered");
    assert_eq!(degraded.stats["TEST001"].total, 1);
    assert_eq!(degraded.poll_failures, 1);
}
