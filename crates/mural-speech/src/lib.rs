//! Mural Speech crate - Continuous speech capture with auto-restart.
//!
//! Owns a toggle-driven capture session over an abstract recognition
//! backend: Idle -> Listening -> Idle. While listening, finalized transcript
//! segments are normalized and appended to the transcript buffer with
//! duplicate suppression across chained session restarts. A backend session
//! that terminates itself (silence, for example) is restarted automatically
//! until the user explicitly stops. The restart decision always re-reads
//! the live state machine, never a captured flag.

pub mod backend;
pub mod controller;
pub mod error;
pub mod state;
pub mod transcript;

pub use backend::{
    MockRecognitionBackend, RecognitionBackend, RecognitionConfig, RecognitionEvent,
};
pub use controller::{SpeechController, SpeechEvent};
pub use error::{RecognitionFault, SpeechError};
pub use state::{CaptureState, StateMachine};
pub use transcript::{normalize, TranscriptBuffer};
