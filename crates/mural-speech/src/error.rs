//! Error types for the speech capture subsystem.

use std::fmt;

use mural_core::error::MuralError;

/// Errors from starting or stopping speech capture.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("Speech recognition is not supported on this host")]
    UnsupportedCapability,
    #[error("Microphone access denied")]
    PermissionDenied,
    #[error("Speech capture is already running")]
    AlreadyListening,
    #[error("Speech capture is not running")]
    NotListening,
    #[error("Recognition backend error: {0}")]
    Backend(String),
}

impl From<SpeechError> for MuralError {
    fn from(err: SpeechError) -> Self {
        MuralError::Speech(err.to_string())
    }
}

/// Non-fatal faults surfaced by a live recognition session.
///
/// `PermissionDenied` abandons the session; the other kinds are surfaced to
/// the user and the session continues (or restarts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionFault {
    /// Microphone access was refused.
    PermissionDenied,
    /// No speech was detected before the session gave up. Informational.
    NoSpeech,
    /// Passthrough of an underlying diagnostic code.
    Other(String),
}

impl fmt::Display for RecognitionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognitionFault::PermissionDenied => write!(f, "Microphone access denied"),
            RecognitionFault::NoSpeech => write!(f, "No speech detected"),
            RecognitionFault::Other(code) => write!(f, "Recognition error: {}", code),
        }
    }
}
