use serde::{Deserialize, Serialize};

/// Gaze/attention label produced by the head-pose classification service.
///
/// `Unknown` covers both unrecognized service output and failed
/// classification calls; it never triggers an alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Forward,
    Left,
    Right,
    Absent,
    Unknown,
}

impl Direction {
    /// Parse the label string the classification service emits.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Looking Forward" => Direction::Forward,
            "Looking Left" => Direction::Left,
            "Looking Right" => Direction::Right,
            "No face detected" => Direction::Absent,
            _ => Direction::Unknown,
        }
    }

    /// The wire label, matching what the service emits for this direction.
    pub fn as_label(&self) -> &'static str {
        match self {
            Direction::Forward => "Looking Forward",
            Direction::Left => "Looking Left",
            Direction::Right => "Looking Right",
            Direction::Absent => "No face detected",
            Direction::Unknown => "Unknown",
        }
    }

    /// Whether a sample with this direction raises an alert.
    ///
    /// `Unknown` is fail-open: a tick whose classification failed or came
    /// back unrecognizable must not alarm the proctor.
    pub fn is_anomalous(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right | Direction::Absent)
    }
}
