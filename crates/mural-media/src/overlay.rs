//! Overlay references and the insertion-ordered overlay set.

use std::path::{Path, PathBuf};

use mural_core::types::{MediaKind, Timestamp};

/// A resolved, existence-confirmed pointer to a media asset.
///
/// Keyed by asset path (which embeds the normalized phrase). References are
/// never mutated or removed individually, only cleared en masse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReference {
    pub kind: MediaKind,
    /// The normalized phrase the asset was resolved from.
    pub phrase: String,
    /// Confirmed asset path.
    pub path: PathBuf,
    /// When the probe confirmed existence.
    pub resolved_at: Timestamp,
}

/// Insertion-ordered set of media references, keyed by path.
///
/// Duplicates are structurally impossible: `insert` re-checks membership at
/// insertion time, so a probe completing after an identical reference landed
/// (or after a clear emptied the set) still behaves idempotently.
#[derive(Debug, Clone, Default)]
pub struct OverlaySet {
    refs: Vec<MediaReference>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reference for `path` is already present.
    pub fn contains_path(&self, path: &Path) -> bool {
        self.refs.iter().any(|r| r.path == path)
    }

    /// Insert a reference unless its path is already present.
    ///
    /// Returns `true` if the reference was added.
    pub fn insert(&mut self, reference: MediaReference) -> bool {
        if self.contains_path(&reference.path) {
            return false;
        }
        self.refs.push(reference);
        true
    }

    /// All references in insertion order.
    pub fn references(&self) -> &[MediaReference] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Drop all references.
    pub fn clear(&mut self) {
        self.refs.clear();
    }
}
