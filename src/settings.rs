use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

const DEFAULT_CAPTURE_INTERVAL_SECS: u64 = 5;
const DEFAULT_CLASSIFY_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Tunable policy for one monitored session and the dashboard feed.
///
/// Intervals default to the values above; `PROCTORWATCH_DEBUG=1` shortens
/// them to one second for local runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the proctoring backend (classification, alert ingest,
    /// alert retrieval all live there), no trailing slash.
    pub backend_url: String,
    /// Seconds between webcam captures while a session is active.
    pub capture_interval_secs: u64,
    /// Upper bound on one capture-classify round trip.
    pub classify_timeout_secs: u64,
    /// Seconds between dashboard polls of the alert list.
    pub poll_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:5000".into(),
            capture_interval_secs: DEFAULT_CAPTURE_INTERVAL_SECS,
            classify_timeout_secs: DEFAULT_CLASSIFY_TIMEOUT_SECS,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Settings {
    pub fn capture_interval(&self) -> Duration {
        Duration::from_secs(self.capture_interval_secs)
    }

    pub fn classify_timeout(&self) -> Duration {
        Duration::from_secs(self.classify_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Apply the debug env switch: all intervals drop to 1s.
    pub fn apply_env_overrides(mut self) -> Self {
        let debug_mode = std::env::var("PROCTORWATCH_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            self.capture_interval_secs = 1;
            self.poll_interval_secs = 1;
        }
        self
    }
}

/// On-disk settings with load-or-default semantics. A missing or corrupt
/// file falls back to defaults rather than blocking startup.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<Settings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            Settings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn current(&self) -> Settings {
        self.data.read().unwrap().clone()
    }

    pub fn update(&self, settings: Settings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &Settings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
