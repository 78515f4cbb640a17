pub mod client;
pub mod frame;

pub use client::{Classification, ClassificationClient, Classify, ClassifyError};
pub use frame::{CaptureError, FileFrameSource, Frame, FrameSource};
