//! Events pushed to progress subscribers.
//!
//! # Wire Format
//!
//! Each event is one SSE `data:` frame holding a JSON object:
//!
//! ```json
//! { "progress": 42 }
//! { "done": true, "success": false }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Event broadcast to every open progress stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Percentage complete, always within 0..=100.
    Progress { percent: u8 },
    /// Terminal notification, emitted once per session.
    Done { success: bool },
}

impl ProgressEvent {
    /// Progress event, clamping the value to 100.
    pub fn progress(percent: u8) -> Self {
        Self::Progress {
            percent: percent.min(100),
        }
    }

    pub const fn done(success: bool) -> Self {
        Self::Done { success }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    /// Serialize to the JSON payload carried by one SSE frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for ProgressEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Progress { percent } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("progress", percent)?;
                map.end()
            }
            Self::Done { success } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("done", &true)?;
                map.serialize_entry("success", success)?;
                map.end()
            }
        }
    }
}
