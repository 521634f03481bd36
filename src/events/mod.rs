//! Events module for trigger loop activity
//!
//! Provides structured event types broadcast by the trigger loop each time
//! a playback starts and ends.

use serde::{Deserialize, Serialize};

/// Events emitted by the trigger loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// The trigger hotkey was observed
    Triggered,

    /// Every directive was played
    PlaybackComplete {
        /// Wall time of the playback in milliseconds
        duration_ms: u64,
        /// Number of directives played
        directives: usize,
    },

    /// Playback stopped at a failing directive
    PlaybackFailed {
        /// Wall time until the failure in milliseconds
        duration_ms: u64,
        error: String,
    },
}

impl std::fmt::Display for PlaybackEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackEvent::Triggered => write!(f, "TRIGGERED"),
            PlaybackEvent::PlaybackComplete {
                duration_ms,
                directives,
            } => {
                write!(f, "PLAYBACK_COMPLETE ({} directives, {}ms)", directives, duration_ms)
            }
            PlaybackEvent::PlaybackFailed { duration_ms, error } => {
                write!(f, "PLAYBACK_FAILED ({}ms): {}", duration_ms, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = PlaybackEvent::PlaybackComplete {
            duration_ms: 1500,
            directives: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("playback_complete"));
        assert!(json.contains("1500"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"triggered"}"#;
        let event: PlaybackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, PlaybackEvent::Triggered);
    }

    #[test]
    fn test_event_display() {
        let event = PlaybackEvent::PlaybackFailed {
            duration_ms: 12,
            error: "boom".to_string(),
        };
        assert_eq!(event.to_string(), "PLAYBACK_FAILED (12ms): boom");
    }
}
