//! Recognition backend abstraction.
//!
//! The host's continuous-recognition capability is an external collaborator;
//! this trait is the seam. A session is a channel of recognition events that
//! closes when the session terminates, whether gracefully or on its own
//! (silence timeouts are normal backend behavior).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::{RecognitionFault, SpeechError};

/// Configuration applied to every recognition session.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// Recognition locale, e.g. "en-US".
    pub locale: String,
    /// Whether interim (non-finalized) results are delivered. The controller
    /// always runs with interim results suppressed.
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            interim_results: false,
        }
    }
}

/// Events delivered by a live recognition session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// One batch of finalized transcript segments.
    Results(Vec<String>),
    /// A non-fatal fault. See `RecognitionFault` for handling per kind.
    Fault(RecognitionFault),
    /// The session terminated on its own. Channel closure means the same.
    Ended,
}

/// Provider of continuous recognition sessions.
///
/// Implementations must detect capability absence via `is_supported` before
/// `open` is ever called; an unsupported host surfaces
/// `SpeechError::UnsupportedCapability` to the user instead of crashing.
pub trait RecognitionBackend: Send + Sync + 'static {
    /// Whether the capability exists on this host.
    fn is_supported(&self) -> bool;

    /// Open a new continuous recognition session.
    ///
    /// Events arrive on the returned channel until the session ends. The
    /// backend owns session lifetime; dropping the receiver abandons it.
    fn open(
        &self,
        config: &RecognitionConfig,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>, SpeechError>;

    /// Request graceful termination of the active session, if any.
    fn shutdown(&self);
}

/// Mock recognition backend for tests and hosts without a native capability.
///
/// Two modes, combinable:
/// - **Scripted**: each `open` call consumes the next pre-recorded event
///   sequence and closes the session afterwards (models self-termination).
/// - **Live**: with no script remaining, `open` leaves the session running
///   and events are injected through `push_results` / `push_fault` until
///   `end_session` or `shutdown`.
#[derive(Debug, Clone)]
pub struct MockRecognitionBackend {
    inner: Arc<MockInner>,
}

#[derive(Debug)]
struct MockInner {
    supported: bool,
    opens: AtomicUsize,
    scripts: Mutex<VecDeque<Vec<RecognitionEvent>>>,
    live: Mutex<Option<mpsc::UnboundedSender<RecognitionEvent>>>,
}

impl MockRecognitionBackend {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MockInner {
                supported: true,
                opens: AtomicUsize::new(0),
                scripts: Mutex::new(VecDeque::new()),
                live: Mutex::new(None),
            }),
        }
    }

    /// A backend whose capability is absent on this host.
    pub fn unsupported() -> Self {
        Self {
            inner: Arc::new(MockInner {
                supported: false,
                opens: AtomicUsize::new(0),
                scripts: Mutex::new(VecDeque::new()),
                live: Mutex::new(None),
            }),
        }
    }

    /// A backend that replays one event sequence per session.
    pub fn with_scripts(scripts: Vec<Vec<RecognitionEvent>>) -> Self {
        let backend = Self::new();
        *backend.inner.scripts.lock().expect("scripts mutex poisoned") =
            scripts.into_iter().collect();
        backend
    }

    /// Number of sessions opened so far. Restart behavior is asserted on
    /// this counter.
    pub fn open_count(&self) -> usize {
        self.inner.opens.load(Ordering::SeqCst)
    }

    /// Inject a finalized result batch into the live session.
    ///
    /// Returns `false` if no live session is active.
    pub fn push_results(&self, segments: Vec<String>) -> bool {
        self.send(RecognitionEvent::Results(segments))
    }

    /// Inject a fault into the live session.
    pub fn push_fault(&self, fault: RecognitionFault) -> bool {
        self.send(RecognitionEvent::Fault(fault))
    }

    /// Terminate the live session as the backend would on silence.
    pub fn end_session(&self) {
        self.inner.live.lock().expect("live mutex poisoned").take();
    }

    fn send(&self, event: RecognitionEvent) -> bool {
        let live = self.inner.live.lock().expect("live mutex poisoned");
        match live.as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }
}

impl Default for MockRecognitionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecognitionBackend for MockRecognitionBackend {
    fn is_supported(&self) -> bool {
        self.inner.supported
    }

    fn open(
        &self,
        _config: &RecognitionConfig,
    ) -> Result<mpsc::UnboundedReceiver<RecognitionEvent>, SpeechError> {
        if !self.inner.supported {
            return Err(SpeechError::UnsupportedCapability);
        }
        self.inner.opens.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();

        let script = self
            .inner
            .scripts
            .lock()
            .expect("scripts mutex poisoned")
            .pop_front();
        match script {
            Some(events) => {
                // Scripted session: deliver and self-terminate.
                for event in events {
                    let _ = tx.send(event);
                }
            }
            None => {
                *self.inner.live.lock().expect("live mutex poisoned") = Some(tx);
            }
        }
        Ok(rx)
    }

    fn shutdown(&self) {
        self.end_session();
    }
}
