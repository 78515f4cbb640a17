pub mod controller;
pub mod feed;

pub use controller::{AlertFetcher, FeedController, FetchAlerts};
pub use feed::{CandidateStats, FeedPollError, FeedSnapshot, FeedState};
