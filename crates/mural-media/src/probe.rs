//! Asset existence probes.
//!
//! The asset store is an external collaborator with no listing API:
//! existence is confirmed by probing the candidate path. The trait abstracts
//! the probe mechanism so tests can use the mock.

use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Asynchronous existence check for a candidate asset path.
pub trait AssetProbe: Send + Sync + 'static {
    /// Probe the candidate path. `true` confirms the asset exists.
    ///
    /// Probes must not fail the caller: any I/O problem reads as "absent".
    fn probe(&self, path: &Path) -> impl Future<Output = bool> + Send;
}

/// Filesystem probe: a head-style metadata check, no content read.
#[derive(Debug, Clone, Default)]
pub struct FsAssetProbe;

impl FsAssetProbe {
    pub fn new() -> Self {
        Self
    }
}

impl AssetProbe for FsAssetProbe {
    async fn probe(&self, path: &Path) -> bool {
        match tokio::fs::metadata(path).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }
}

/// Mock probe over a fixed set of present paths.
///
/// An optional artificial latency makes completion-order races exercisable
/// in tests.
#[derive(Debug, Clone, Default)]
pub struct MockAssetProbe {
    present: HashSet<PathBuf>,
    latency: Option<Duration>,
    probes: Arc<AtomicUsize>,
}

impl MockAssetProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe that confirms exactly the given paths.
    pub fn with_assets<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            present: paths.into_iter().map(Into::into).collect(),
            latency: None,
            probes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Delay every probe by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of probes issued. Dedup-before-probe is asserted on this.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

impl AssetProbe for MockAssetProbe {
    async fn probe(&self, path: &Path) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.present.contains(path)
    }
}
