//! Exam-session monitoring and proctor dashboard feed.
//!
//! A candidate's session runs a monitor loop: capture a webcam frame every
//! few seconds, ask the remote head-pose service which way the candidate is
//! looking, and report anything other than forward to the alert store. The
//! proctor side polls that store on a schedule and derives per-candidate
//! statistics. Every remote failure degrades gracefully: a failed
//! classification tick is treated as unknown, a dropped alert is logged and
//! lost, a failed poll keeps showing the previous list.

pub mod classify;
pub mod dashboard;
pub mod guard;
pub mod models;
pub mod monitor;
pub mod reporter;
pub mod settings;
pub mod utils;

pub use classify::{ClassificationClient, Classify, ClassifyError, FileFrameSource, Frame, FrameSource};
pub use dashboard::{AlertFetcher, FeedController, FeedPollError, FeedSnapshot};
pub use guard::{ensure_teacher, start_session, GuardError, SessionContext};
pub use models::{AlertEvent, AlertRecord, CandidateSession, Direction, DirectionSample, MonitorStatus};
pub use monitor::{MonitorController, MonitorDeps, MonitorPolicy};
pub use reporter::{AlertReporter, DeliveryError, ReportAlerts};
pub use settings::{Settings, SettingsStore};
