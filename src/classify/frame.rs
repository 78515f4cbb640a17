use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// One webcam snapshot. Lives for exactly one classification round trip;
/// `into_bytes` consumes it so nothing downstream can hold on to the image.
#[derive(Debug)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("frame capture failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture produced an empty frame")]
    Empty,
}

/// Source of webcam snapshots. The actual camera lives outside this crate;
/// the monitor loop only needs one frame per tick.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn next_frame(&self) -> Result<Frame, CaptureError>;
}

/// Reads a frame from a file path on every tick. Stands in for a camera
/// when running against a live backend from the CLI.
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FrameSource for FileFrameSource {
    async fn next_frame(&self) -> Result<Frame, CaptureError> {
        let bytes = tokio::fs::read(&self.path).await?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(Frame::new(bytes))
    }
}
