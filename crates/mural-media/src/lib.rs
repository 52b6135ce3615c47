//! Mural Media crate - Voice-to-media resolution pipeline.
//!
//! Maps finalized transcript segments to deduplicated, existence-confirmed
//! image and video asset references. Resolution is probe-based: a candidate
//! path is derived from the phrase by a deterministic naming convention and
//! asynchronously probed; only confirmed assets become overlay references.
//! The overlay lists are insertion-ordered sets keyed by asset path.

pub mod overlay;
pub mod probe;
pub mod resolver;

pub use overlay::{MediaReference, OverlaySet};
pub use probe::{AssetProbe, FsAssetProbe, MockAssetProbe};
pub use resolver::{MediaNaming, MediaResolver};
