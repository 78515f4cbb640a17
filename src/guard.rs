//! Admission checks for the candidate session and the proctor dashboard.
//!
//! Identity state is passed in as an explicit [`SessionContext`] value
//! rather than read from ambient storage, so the checks are pure reads and
//! the same context always yields the same answer.

use thiserror::Error;

use crate::models::CandidateSession;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuardError {
    /// No usable identity was presented. The caller should send the user
    /// back to the relevant login screen; nothing else is affected.
    #[error("not authenticated")]
    Unauthenticated,
}

/// Identity state as captured at the boundary (login screens populate it,
/// the guards only read it).
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub candidate_token: Option<String>,
    pub teacher_logged_in: bool,
    pub teacher_username: Option<String>,
}

impl SessionContext {
    pub fn for_candidate(token: impl Into<String>) -> Self {
        Self {
            candidate_token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn for_teacher(username: impl Into<String>) -> Self {
        Self {
            teacher_logged_in: true,
            teacher_username: Some(username.into()),
            ..Default::default()
        }
    }
}

/// Admit a candidate: a non-empty token yields a fresh session, anything
/// else is `Unauthenticated` and no session exists.
pub fn start_session(ctx: &SessionContext) -> Result<CandidateSession, GuardError> {
    match ctx.candidate_token.as_deref() {
        Some(token) if !token.is_empty() => Ok(CandidateSession::new(token.to_string())),
        _ => Err(GuardError::Unauthenticated),
    }
}

/// Admit a proctor to the dashboard: requires the teacher flag.
pub fn ensure_teacher(ctx: &SessionContext) -> Result<(), GuardError> {
    if ctx.teacher_logged_in {
        Ok(())
    } else {
        Err(GuardError::Unauthenticated)
    }
}
