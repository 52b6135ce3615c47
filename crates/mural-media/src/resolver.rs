//! Phrase-to-asset resolution pipeline.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tracing::{info, trace, warn};

use mural_core::config::MediaConfig;
use mural_core::events::BoardEvent;
use mural_core::types::MediaKind;

use crate::overlay::{MediaReference, OverlaySet};
use crate::probe::AssetProbe;

/// Deterministic candidate naming: one fixed directory per media kind, the
/// exact trimmed phrase as the file stem, one fixed extension per kind.
#[derive(Debug, Clone)]
pub struct MediaNaming {
    image_dir: PathBuf,
    video_dir: PathBuf,
    image_ext: String,
    video_ext: String,
}

impl From<&MediaConfig> for MediaNaming {
    fn from(config: &MediaConfig) -> Self {
        Self {
            image_dir: PathBuf::from(&config.image_dir),
            video_dir: PathBuf::from(&config.video_dir),
            image_ext: config.image_ext.clone(),
            video_ext: config.video_ext.clone(),
        }
    }
}

impl MediaNaming {
    /// Candidate asset path for a trimmed phrase.
    pub fn candidate(&self, kind: MediaKind, phrase: &str) -> PathBuf {
        let (dir, ext) = match kind {
            MediaKind::Image => (&self.image_dir, &self.image_ext),
            MediaKind::Video => (&self.video_dir, &self.video_ext),
        };
        dir.join(format!("{}.{}", phrase, ext))
    }
}

/// Maps transcript segments to deduplicated, existence-confirmed overlay
/// references.
///
/// Resolution is fully asynchronous and idempotent: segments may be resolved
/// concurrently in any completion order, because membership is checked both
/// before probing (skip known paths) and again at insertion time against the
/// current set.
#[derive(Debug)]
pub struct MediaResolver<P: AssetProbe> {
    probe: Arc<P>,
    naming: Arc<MediaNaming>,
    images: Arc<Mutex<OverlaySet>>,
    videos: Arc<Mutex<OverlaySet>>,
    events: Option<mpsc::UnboundedSender<BoardEvent>>,
}

impl<P: AssetProbe> Clone for MediaResolver<P> {
    fn clone(&self) -> Self {
        Self {
            probe: Arc::clone(&self.probe),
            naming: Arc::clone(&self.naming),
            images: Arc::clone(&self.images),
            videos: Arc::clone(&self.videos),
            events: self.events.clone(),
        }
    }
}

impl<P: AssetProbe> MediaResolver<P> {
    pub fn new(probe: P, config: &MediaConfig) -> Self {
        Self {
            probe: Arc::new(probe),
            naming: Arc::new(MediaNaming::from(config)),
            images: Arc::new(Mutex::new(OverlaySet::new())),
            videos: Arc::new(Mutex::new(OverlaySet::new())),
            events: None,
        }
    }

    /// Emit `BoardEvent`s for resolved and missed overlays.
    pub fn with_events(mut self, events: mpsc::UnboundedSender<BoardEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Resolve one finalized transcript segment against both media kinds.
    ///
    /// The image and video probes run concurrently. Callers typically spawn
    /// this per segment, fire-and-forget; nothing here depends on issuance
    /// order.
    pub async fn resolve_segment(&self, segment: &str) {
        let phrase = segment.trim();
        if phrase.is_empty() {
            return;
        }
        tokio::join!(
            self.resolve_kind(MediaKind::Image, phrase),
            self.resolve_kind(MediaKind::Video, phrase),
        );
    }

    async fn resolve_kind(&self, kind: MediaKind, phrase: &str) {
        let path = self.naming.candidate(kind, phrase);

        // Dedup precedes probing: a path already in the set is never
        // re-probed.
        if self.set(kind).lock().expect("overlay mutex poisoned").contains_path(&path) {
            trace!(kind = %kind, path = %path.display(), "Already resolved; probe skipped");
            return;
        }

        if self.probe.probe(&path).await {
            let reference = MediaReference {
                kind,
                phrase: phrase.to_string(),
                path: path.clone(),
                resolved_at: chrono::Utc::now(),
            };
            // Membership is re-evaluated against the current set: a
            // concurrent probe for the same path may have finished first.
            let inserted = self
                .set(kind)
                .lock()
                .expect("overlay mutex poisoned")
                .insert(reference);
            if inserted {
                info!(kind = %kind, path = %path.display(), "Overlay resolved");
                self.emit(BoardEvent::OverlayResolved {
                    kind,
                    phrase: phrase.to_string(),
                    path: path.display().to_string(),
                    timestamp: chrono::Utc::now(),
                });
            }
        } else {
            warn!(kind = %kind, path = %path.display(), "Asset not found; no overlay added");
            self.emit(BoardEvent::OverlayMissed {
                kind,
                path: path.display().to_string(),
                timestamp: chrono::Utc::now(),
            });
        }
    }

    /// Current image references, in insertion order.
    pub fn images(&self) -> Vec<MediaReference> {
        self.set(MediaKind::Image)
            .lock()
            .expect("overlay mutex poisoned")
            .references()
            .to_vec()
    }

    /// Current video references, in insertion order.
    pub fn videos(&self) -> Vec<MediaReference> {
        self.set(MediaKind::Video)
            .lock()
            .expect("overlay mutex poisoned")
            .references()
            .to_vec()
    }

    /// Drop all image references. Future resolution is unaffected.
    pub fn clear_images(&self) {
        self.clear(MediaKind::Image);
    }

    /// Drop all video references. Future resolution is unaffected.
    pub fn clear_videos(&self) {
        self.clear(MediaKind::Video);
    }

    fn clear(&self, kind: MediaKind) {
        self.set(kind)
            .lock()
            .expect("overlay mutex poisoned")
            .clear();
        info!(kind = %kind, "Overlay references cleared");
    }

    fn set(&self, kind: MediaKind) -> &Arc<Mutex<OverlaySet>> {
        match kind {
            MediaKind::Image => &self.images,
            MediaKind::Video => &self.videos,
        }
    }

    fn emit(&self, event: BoardEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::MockAssetProbe;
    use std::path::Path;
    use std::time::Duration;

    fn config() -> MediaConfig {
        MediaConfig::default()
    }

    #[test]
    fn test_candidate_naming() {
        let naming = MediaNaming::from(&config());
        assert_eq!(
            naming.candidate(MediaKind::Image, "cat"),
            Path::new("assets/images/cat.jpeg")
        );
        assert_eq!(
            naming.candidate(MediaKind::Video, "red fox"),
            Path::new("assets/videos/red fox.mp4")
        );
    }

    #[tokio::test]
    async fn test_resolves_existing_assets() {
        let probe = MockAssetProbe::with_assets([
            "assets/images/cat.jpeg",
            "assets/videos/cat.mp4",
        ]);
        let resolver = MediaResolver::new(probe, &config());

        resolver.resolve_segment("cat").await;
        assert_eq!(resolver.images().len(), 1);
        assert_eq!(resolver.videos().len(), 1);
        assert_eq!(resolver.images()[0].phrase, "cat");
        assert_eq!(
            resolver.images()[0].path,
            Path::new("assets/images/cat.jpeg")
        );
    }

    #[tokio::test]
    async fn test_missing_asset_adds_nothing() {
        let resolver = MediaResolver::new(MockAssetProbe::new(), &config());
        resolver.resolve_segment("cat").await;
        assert!(resolver.images().is_empty());
        assert!(resolver.videos().is_empty());
    }

    #[tokio::test]
    async fn test_partial_resolution() {
        // Image exists, video does not.
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"]);
        let resolver = MediaResolver::new(probe, &config());
        resolver.resolve_segment("cat").await;
        assert_eq!(resolver.images().len(), 1);
        assert!(resolver.videos().is_empty());
    }

    #[tokio::test]
    async fn test_repeat_phrase_skips_probe() {
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"]);
        let counter = probe.clone();
        let resolver = MediaResolver::new(probe, &config());

        resolver.resolve_segment("cat").await;
        let after_first = counter.probe_count();
        resolver.resolve_segment("cat").await;
        // The image probe is skipped outright; only the (still unresolved)
        // video candidate is probed again.
        assert_eq!(counter.probe_count(), after_first + 1);
        assert_eq!(resolver.images().len(), 1);
    }

    #[tokio::test]
    async fn test_segment_is_trimmed() {
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"]);
        let resolver = MediaResolver::new(probe, &config());
        resolver.resolve_segment("  cat  ").await;
        assert_eq!(resolver.images().len(), 1);
        // Same path after trimming: no duplicate.
        resolver.resolve_segment("cat").await;
        assert_eq!(resolver.images().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_segment_is_noop() {
        let probe = MockAssetProbe::new();
        let counter = probe.clone();
        let resolver = MediaResolver::new(probe, &config());
        resolver.resolve_segment("   ").await;
        assert_eq!(counter.probe_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_allows_re_resolution() {
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"]);
        let resolver = MediaResolver::new(probe, &config());

        resolver.resolve_segment("cat").await;
        assert_eq!(resolver.images().len(), 1);

        resolver.clear_images();
        assert!(resolver.images().is_empty());

        // The dedup set was emptied, so the phrase re-probes and re-resolves.
        resolver.resolve_segment("cat").await;
        assert_eq!(resolver.images().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_resolution_is_idempotent() {
        // Slow probes force overlapping resolution of the same phrase: both
        // pass the pre-probe check, and the insertion-time re-check keeps
        // the set duplicate-free.
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"])
            .with_latency(Duration::from_millis(20));
        let resolver = MediaResolver::new(probe, &config());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let r = resolver.clone();
            handles.push(tokio::spawn(async move { r.resolve_segment("cat").await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(resolver.images().len(), 1);
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let probe = MockAssetProbe::with_assets(["assets/images/cat.jpeg"]);
        let resolver = MediaResolver::new(probe, &config()).with_events(tx);

        resolver.resolve_segment("cat").await;

        let mut resolved = 0;
        let mut missed = 0;
        while let Ok(event) = rx.try_recv() {
            match event {
                BoardEvent::OverlayResolved { kind, .. } => {
                    assert_eq!(kind, MediaKind::Image);
                    resolved += 1;
                }
                BoardEvent::OverlayMissed { kind, .. } => {
                    assert_eq!(kind, MediaKind::Video);
                    missed += 1;
                }
                _ => {}
            }
        }
        assert_eq!(resolved, 1);
        assert_eq!(missed, 1);
    }
}
