use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{MediaKind, Timestamp};

/// Domain events emitted by the mural subsystems.
///
/// Events are produced after state changes and consumed by the presentation
/// layer (overlay list, transcript view, user-facing alerts) and the event
/// log. The canvas subsystem is deliberately absent: pointer flow is
/// synchronous and its state is read directly from the surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BoardEvent {
    /// A speech capture session became active.
    SpeechStarted {
        session_id: Uuid,
        timestamp: Timestamp,
    },

    /// Speech capture was stopped by the user.
    SpeechStopped { timestamp: Timestamp },

    /// A finalized, normalized transcript segment was appended.
    TranscriptAppended {
        segment: String,
        timestamp: Timestamp,
    },

    /// A spoken phrase resolved to an existing media asset.
    OverlayResolved {
        kind: MediaKind,
        phrase: String,
        path: String,
        timestamp: Timestamp,
    },

    /// A spoken phrase had no matching asset. Informational only.
    OverlayMissed {
        kind: MediaKind,
        path: String,
        timestamp: Timestamp,
    },

    /// A non-fatal speech recognition fault was surfaced to the user.
    SpeechFault {
        message: String,
        timestamp: Timestamp,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serde_roundtrip() {
        let event = BoardEvent::OverlayResolved {
            kind: MediaKind::Image,
            phrase: "cat".to_string(),
            path: "assets/images/cat.jpeg".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: BoardEvent = serde_json::from_str(&json).unwrap();
        match back {
            BoardEvent::OverlayResolved { kind, phrase, .. } => {
                assert_eq!(kind, MediaKind::Image);
                assert_eq!(phrase, "cat");
            }
            other => panic!("Unexpected event: {:?}", other),
        }
    }
}
