//! Speech capture controller: toggle-driven session lifecycle.
//!
//! Owns the continuous recognition session and its auto-recovery loop. A
//! session that terminates itself is restarted after a short delay for as
//! long as the state machine still reads `Listening`; an explicit `stop()`
//! flips the state first, so a restart that races with it observes `Idle`
//! and dies instead of resurrecting the session.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use uuid::Uuid;

use mural_core::config::SpeechConfig;

use crate::backend::{RecognitionBackend, RecognitionConfig, RecognitionEvent};
use crate::error::{RecognitionFault, SpeechError};
use crate::state::{CaptureState, StateMachine};
use crate::transcript::TranscriptBuffer;

/// Events emitted by the controller for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A recognition session became active (initial start or auto-restart).
    Started { session_id: Uuid },
    /// A normalized transcript segment was appended to the buffer.
    Segment { text: String },
    /// A non-fatal recognition fault to surface to the user.
    Fault { fault: RecognitionFault },
    /// The capture loop exited. Final state is `Idle`.
    Stopped,
}

/// Toggle-driven controller over an abstract recognition backend.
///
/// Cloning is cheap and clones share all state; the background session loop
/// holds one clone.
#[derive(Debug)]
pub struct SpeechController<B: RecognitionBackend> {
    backend: Arc<B>,
    state: StateMachine,
    transcript: Arc<Mutex<TranscriptBuffer>>,
    config: RecognitionConfig,
    restart_delay: Duration,
    events: mpsc::UnboundedSender<SpeechEvent>,
}

impl<B: RecognitionBackend> Clone for SpeechController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: self.state.clone(),
            transcript: Arc::clone(&self.transcript),
            config: self.config.clone(),
            restart_delay: self.restart_delay,
            events: self.events.clone(),
        }
    }
}

impl<B: RecognitionBackend> SpeechController<B> {
    /// Create a controller and the event channel the presentation layer
    /// drains.
    pub fn new(backend: B, config: &SpeechConfig) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            backend: Arc::new(backend),
            state: StateMachine::new(),
            transcript: Arc::new(Mutex::new(TranscriptBuffer::new())),
            config: RecognitionConfig {
                locale: config.locale.clone(),
                interim_results: false,
            },
            restart_delay: Duration::from_millis(config.restart_delay_ms),
            events: tx,
        };
        (controller, rx)
    }

    pub fn state(&self) -> CaptureState {
        self.state.current()
    }

    pub fn is_listening(&self) -> bool {
        self.state.current() == CaptureState::Listening
    }

    /// The accumulated transcript, one segment per line.
    pub fn transcript_text(&self) -> String {
        self.transcript
            .lock()
            .expect("transcript mutex poisoned")
            .text()
    }

    /// Drop the accumulated transcript. Explicit user action.
    pub fn clear_transcript(&self) {
        self.transcript
            .lock()
            .expect("transcript mutex poisoned")
            .clear();
    }

    /// Start capturing.
    ///
    /// Fails with `UnsupportedCapability` if the host has no recognition
    /// capability, or `AlreadyListening` if capture is running. On success
    /// the session loop runs in the background until `stop()`.
    pub fn start(&self) -> Result<(), SpeechError> {
        if !self.backend.is_supported() {
            return Err(SpeechError::UnsupportedCapability);
        }
        self.state.transition(CaptureState::Listening)?;
        let this = self.clone();
        tokio::spawn(async move { this.session_loop().await });
        Ok(())
    }

    /// Stop capturing and request graceful session termination.
    ///
    /// The state flips to `Idle` before the backend is shut down, so any
    /// in-flight restart decision observes the stop.
    pub fn stop(&self) -> Result<(), SpeechError> {
        self.state.transition(CaptureState::Idle)?;
        self.backend.shutdown();
        Ok(())
    }

    /// Toggle capture, returning the new state.
    pub fn toggle(&self) -> Result<CaptureState, SpeechError> {
        match self.state.current() {
            CaptureState::Idle => {
                self.start()?;
                Ok(CaptureState::Listening)
            }
            CaptureState::Listening => {
                self.stop()?;
                Ok(CaptureState::Idle)
            }
        }
    }

    async fn session_loop(self) {
        loop {
            // Re-read the live state at every iteration boundary, before a
            // session is opened: a stop() issued between start() and this
            // task's first run, or during the restart delay, must win.
            if self.state.current() != CaptureState::Listening {
                break;
            }

            let mut session = match self.backend.open(&self.config) {
                Ok(rx) => rx,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to open recognition session");
                    let _ = self.events.send(SpeechEvent::Fault {
                        fault: RecognitionFault::Other(e.to_string()),
                    });
                    self.state.reset();
                    break;
                }
            };

            let session_id = Uuid::new_v4();
            tracing::info!(
                session_id = %session_id,
                locale = %self.config.locale,
                "Recognition session opened"
            );
            let _ = self.events.send(SpeechEvent::Started { session_id });

            let mut abandoned = false;
            while let Some(event) = session.recv().await {
                match event {
                    RecognitionEvent::Results(segments) => {
                        for raw in segments {
                            let appended = self
                                .transcript
                                .lock()
                                .expect("transcript mutex poisoned")
                                .append(&raw);
                            if let Some(text) = appended {
                                tracing::debug!(segment = %text, "Transcript segment appended");
                                let _ = self.events.send(SpeechEvent::Segment { text });
                            }
                        }
                    }
                    RecognitionEvent::Fault(RecognitionFault::PermissionDenied) => {
                        tracing::warn!("Microphone access denied; abandoning capture");
                        let _ = self.events.send(SpeechEvent::Fault {
                            fault: RecognitionFault::PermissionDenied,
                        });
                        self.state.reset();
                        abandoned = true;
                        break;
                    }
                    RecognitionEvent::Fault(fault) => {
                        tracing::info!(fault = %fault, "Recognition fault; session continues");
                        let _ = self.events.send(SpeechEvent::Fault { fault });
                    }
                    RecognitionEvent::Ended => break,
                }
            }
            if abandoned {
                break;
            }

            // The session terminated on its own. The restart decision is the
            // state check at the top of the next iteration.
            tokio::time::sleep(self.restart_delay).await;
            tracing::debug!(session_id = %session_id, "Session self-terminated; restart check");
        }

        let _ = self.events.send(SpeechEvent::Stopped);
        tracing::info!("Speech capture loop exited");
    }
}
