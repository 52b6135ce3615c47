//! Mural Canvas crate - Stroke rendering and raster-snapshot history.
//!
//! Converts pointer motion into raster ink on a `DrawingSurface`, with draw
//! and erase compositing modes, and maintains an undo/redo history of
//! PNG-encoded full-surface snapshots taken at stroke-start boundaries.
//! Snapshot decode-and-repaint is asynchronous and sequence-stamped so a
//! stale decode can never overwrite a newer repaint.

pub mod error;
pub mod history;
pub mod snapshot;
pub mod stroke;
pub mod surface;
pub mod whiteboard;

pub use error::CanvasError;
pub use history::{DecodedRepaint, HistoryManager, RepaintRequest};
pub use snapshot::{DecodedFrame, Snapshot};
pub use stroke::{StrokeRenderer, StrokeStyle};
pub use surface::{DrawingSurface, InkOp};
pub use whiteboard::Whiteboard;
