use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::models::AlertRecord;

use super::feed::{FeedPollError, FeedSnapshot, FeedState};

// Set to false to silence per-poll logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Retrieval seam for the full alert list.
#[async_trait]
pub trait FetchAlerts: Send + Sync {
    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FeedPollError>;
}

/// HTTP fetcher for the `/alerts` endpoint.
pub struct AlertFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl AlertFetcher {
    /// `base_url` should be like `http://localhost:5000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FetchAlerts for AlertFetcher {
    async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FeedPollError> {
        let url = format!("{}/alerts", self.base_url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedPollError::Server {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.json().await?)
    }
}

/// Owns the dashboard's poll loop and displayed state. Tearing the view
/// down cancels the pending poll ticker.
#[derive(Clone)]
pub struct FeedController {
    state: Arc<Mutex<FeedState>>,
    fetcher: Arc<dyn FetchAlerts>,
    ticker: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
    poll_interval: Duration,
}

impl FeedController {
    pub fn new(fetcher: Arc<dyn FetchAlerts>, poll_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(FeedState::new())),
            fetcher,
            ticker: Arc::new(Mutex::new(None)),
            poll_interval,
        }
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Fetch once and fold the result into the displayed state.
    pub async fn poll_once(&self) {
        let result = self.fetcher.fetch_alerts().await;
        match &result {
            Ok(records) => log_info!("feed poll succeeded: {} alerts", records.len()),
            Err(err) => log_warn!("feed poll failed, keeping previous data: {err}"),
        }
        self.state.lock().await.apply(result);
    }

    pub async fn start_polling(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some((handle, token)) = ticker_guard.take() {
            token.cancel();
            handle.abort();
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();
        let controller = self.clone();
        let poll_interval = self.poll_interval;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        controller.poll_once().await;
                    }
                    _ = token_clone.cancelled() => {
                        log_info!("feed poll loop shutting down");
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some((handle, cancel_token));
    }

    pub async fn stop_polling(&self) {
        if let Some((handle, token)) = self.ticker.lock().await.take() {
            token.cancel();
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Fails every other poll, starting with a success.
    struct FlakyFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FetchAlerts for FlakyFetcher {
        async fn fetch_alerts(&self) -> Result<Vec<AlertRecord>, FeedPollError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call % 2 == 0 {
                Ok(vec![AlertRecord {
                    student_id: "TEST001".into(),
                    direction: "Looking Left".into(),
                    alert_time: "2024-01-01T12:00:00Z".parse().unwrap(),
                    details: None,
                }])
            } else {
                Err(FeedPollError::Server {
                    status: 500,
                    body: "down".into(),
                })
            }
        }
    }

    #[tokio::test]
    async fn poll_once_applies_success_then_survives_failure() {
        let controller = FeedController::new(
            Arc::new(FlakyFetcher {
                calls: AtomicUsize::new(0),
            }),
            Duration::from_secs(5),
        );

        controller.poll_once().await;
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.poll_failures, 0);

        controller.poll_once().await;
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.records.len(), 1, "stale list kept on failure");
        assert_eq!(snapshot.poll_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_loop_ticks_and_stops() {
        let fetcher = Arc::new(FlakyFetcher {
            calls: AtomicUsize::new(0),
        });
        let controller = FeedController::new(fetcher.clone(), Duration::from_secs(5));

        controller.start_polling().await;
        while fetcher.calls.load(Ordering::SeqCst) < 3 {
            tokio::time::advance(Duration::from_secs(5)).await;
            tokio::task::yield_now().await;
        }

        controller.stop_polling().await;
        let calls_at_stop = fetcher.calls.load(Ordering::SeqCst);

        tokio::time::advance(Duration::from_secs(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(
            fetcher.calls.load(Ordering::SeqCst),
            calls_at_stop,
            "no polls after teardown"
        );
    }
}
