use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::models::{CandidateSession, MonitorStatus};

use super::loop_worker::{monitor_loop, MonitorDeps, MonitorPolicy};

/// Owns one session's monitor loop: Idle until started, Active while the
/// loop runs, Terminated once stopped. Stopping cancels the pending tick
/// timer and joins the loop task.
pub struct MonitorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    status: MonitorStatus,
}

impl MonitorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            status: MonitorStatus::Idle,
        }
    }

    pub fn status(&self) -> MonitorStatus {
        self.status
    }

    pub fn start(
        &mut self,
        session: CandidateSession,
        deps: MonitorDeps,
        policy: MonitorPolicy,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("monitor already active");
        }

        info!(
            "starting monitor for candidate {} (session {})",
            session.candidate_id, session.id
        );

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(monitor_loop(session, deps, policy, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.status = MonitorStatus::Active;
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        let result = if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("monitor loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        };

        if self.status == MonitorStatus::Active {
            self.status = MonitorStatus::Terminated;
        }
        result
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
