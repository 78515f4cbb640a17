pub mod alert;
pub mod direction;
pub mod session;

pub use alert::{AlertDetails, AlertEvent, AlertRecord, DirectionSample};
pub use direction::Direction;
pub use session::{CandidateSession, MonitorStatus};
