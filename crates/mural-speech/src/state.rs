//! Capture state machine with thread-safe transitions.
//!
//! The capture lifecycle is toggle-driven: Idle -> Listening (start) and
//! Listening -> Idle (stop). The shared machine is the single source of
//! truth consulted at the moment of any restart decision; restart code must
//! never act on a state value captured earlier.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::error::SpeechError;

/// Operational state of the speech capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureState {
    /// No capture in progress. Ready to start.
    Idle,
    /// A continuous recognition session is active (or restarting).
    Listening,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Listening => write!(f, "Listening"),
        }
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        CaptureState::Idle
    }
}

impl CaptureState {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &CaptureState) -> bool {
        matches!(
            (self, target),
            (CaptureState::Idle, CaptureState::Listening)
                | (CaptureState::Listening, CaptureState::Idle)
        )
    }
}

/// Thread-safe state machine for capture state transitions.
///
/// Clones share the same underlying state, so the controller and its
/// background session loop always observe a single current value.
#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    state: Arc<Mutex<CaptureState>>,
}

impl StateMachine {
    /// Create a new state machine initialized to `Idle`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState::Idle)),
        }
    }

    /// Returns the current state.
    pub fn current(&self) -> CaptureState {
        *self.state.lock().expect("state mutex poisoned")
    }

    /// Attempt to transition to the target state.
    pub fn transition(&self, target: CaptureState) -> Result<(), SpeechError> {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if state.can_transition_to(&target) {
            tracing::debug!("Capture state: {} -> {}", *state, target);
            *state = target;
            Ok(())
        } else {
            Err(match target {
                CaptureState::Listening => SpeechError::AlreadyListening,
                CaptureState::Idle => SpeechError::NotListening,
            })
        }
    }

    /// Force the state machine back to Idle (used when a session aborts).
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("state mutex poisoned");
        if *state != CaptureState::Idle {
            tracing::warn!("Capture state machine reset to Idle from {}", *state);
            *state = CaptureState::Idle;
        }
    }
}
