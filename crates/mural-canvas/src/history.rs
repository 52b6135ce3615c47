//! Undo/redo history over full-surface snapshots.
//!
//! Snapshots are taken at stroke-start boundaries: `push_snapshot` runs once
//! per stroke, before any ink from that stroke lands. `undo` and `redo`
//! exchange the popped snapshot against a snapshot of the live surface, so N
//! undos walk back to the blank initial state and N redos restore the final
//! drawn state.
//!
//! Repaint is asynchronous relative to snapshot decode. Every repaint request
//! carries a monotonic sequence number; `apply` rejects any decode whose
//! sequence is not newer than the last applied one, so out-of-order
//! completions can never overwrite a newer repaint.

use tracing::{debug, trace};

use crate::error::CanvasError;
use crate::snapshot::{DecodedFrame, Snapshot};
use crate::surface::DrawingSurface;

/// A sequence-stamped request to repaint the surface from a snapshot.
#[derive(Debug)]
pub struct RepaintRequest {
    seq: u64,
    snapshot: Snapshot,
}

impl RepaintRequest {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Decode the snapshot off the event thread.
    ///
    /// Decoding never fails the caller: a malformed snapshot yields a
    /// repaint that leaves the surface untouched (the last good frame stays
    /// visible) while still consuming its sequence slot.
    pub async fn decode(self) -> DecodedRepaint {
        let seq = self.seq;
        let snapshot = self.snapshot;
        let outcome = match tokio::task::spawn_blocking(move || snapshot.decode()).await {
            Ok(Ok(frame)) => RepaintOutcome::Frame(frame),
            Ok(Err(e)) => {
                debug!(seq, error = %e, "Snapshot decode failed; keeping last frame");
                RepaintOutcome::Skip
            }
            Err(e) => {
                debug!(seq, error = %e, "Snapshot decode task failed; keeping last frame");
                RepaintOutcome::Skip
            }
        };
        DecodedRepaint { seq, outcome }
    }
}

/// A completed decode, ready to be committed via [`HistoryManager::apply`].
#[derive(Debug)]
pub struct DecodedRepaint {
    seq: u64,
    outcome: RepaintOutcome,
}

#[derive(Debug)]
enum RepaintOutcome {
    Frame(DecodedFrame),
    /// Decode failed; consume the sequence slot without touching the surface.
    Skip,
}

/// State machine over the undo and redo snapshot stacks.
///
/// Both stacks are ordered with the most recent snapshot last. The redo
/// stack is populated only by undo operations and cleared by any new stroke.
#[derive(Debug, Default)]
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    issued_seq: u64,
    applied_seq: u64,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Capture the surface as it is right now and push it onto the undo
    /// stack.
    ///
    /// Invoked exactly once per stroke, at stroke-begin time, before any ink
    /// from that stroke is applied. Clears the redo stack: a new stroke
    /// branches the timeline and the old future becomes unreachable.
    pub fn push_snapshot(&mut self, surface: &DrawingSurface) -> Result<(), CanvasError> {
        let snapshot = Snapshot::capture(surface)?;
        trace!(bytes = snapshot.len(), depth = self.undo_stack.len() + 1, "Snapshot pushed");
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        Ok(())
    }

    /// Step back one stroke.
    ///
    /// No-op (`None`) if the undo stack is empty. Otherwise the most recent
    /// snapshot (the state immediately before the most recently completed
    /// stroke) is popped and returned as a repaint request, and a snapshot
    /// of the live surface is pushed onto the redo stack so the stepped-over
    /// state remains reachable.
    pub fn undo(
        &mut self,
        surface: &DrawingSurface,
    ) -> Result<Option<RepaintRequest>, CanvasError> {
        let Some(target) = self.undo_stack.pop() else {
            return Ok(None);
        };
        let current = match Snapshot::capture(surface) {
            Ok(snap) => snap,
            Err(e) => {
                // Keep the stacks consistent if the live capture fails.
                self.undo_stack.push(target);
                return Err(e);
            }
        };
        self.redo_stack.push(current);
        Ok(Some(self.issue(target)))
    }

    /// Step forward one stroke. Symmetric to [`HistoryManager::undo`].
    ///
    /// No-op (`None`) if the redo stack is empty.
    pub fn redo(
        &mut self,
        surface: &DrawingSurface,
    ) -> Result<Option<RepaintRequest>, CanvasError> {
        let Some(target) = self.redo_stack.pop() else {
            return Ok(None);
        };
        let current = match Snapshot::capture(surface) {
            Ok(snap) => snap,
            Err(e) => {
                self.redo_stack.push(target);
                return Err(e);
            }
        };
        self.undo_stack.push(current);
        Ok(Some(self.issue(target)))
    }

    /// Commit a decoded repaint to the surface.
    ///
    /// Returns `true` if the surface was repainted. Stale decodes, those
    /// superseded by a later-issued repaint that already committed, are
    /// rejected, as are decodes that failed or do not match the surface
    /// geometry.
    pub fn apply(&mut self, surface: &mut DrawingSurface, decoded: DecodedRepaint) -> bool {
        if decoded.seq <= self.applied_seq {
            trace!(
                seq = decoded.seq,
                applied = self.applied_seq,
                "Stale repaint dropped"
            );
            return false;
        }
        self.applied_seq = decoded.seq;
        match decoded.outcome {
            RepaintOutcome::Frame(frame) => match surface.overwrite(&frame) {
                Ok(()) => true,
                Err(e) => {
                    debug!(seq = decoded.seq, error = %e, "Repaint frame rejected");
                    false
                }
            },
            RepaintOutcome::Skip => false,
        }
    }

    fn issue(&mut self, snapshot: Snapshot) -> RepaintRequest {
        self.issued_seq += 1;
        RepaintRequest {
            seq: self.issued_seq,
            snapshot,
        }
    }

    #[cfg(test)]
    fn request_for(&mut self, snapshot: Snapshot) -> RepaintRequest {
        self.issue(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::InkOp;
    use mural_core::types::Point;

    const INK: [u8; 4] = [0, 0, 0, 255];

    fn stroke(surface: &mut DrawingSurface, y: f32) {
        surface.paint_segment(
            Point::new(4.0, y),
            Point::new(28.0, y),
            1.5,
            InkOp::Paint(INK),
        );
    }

    /// Issue an undo and drive it to completion inline.
    async fn run_undo(history: &mut HistoryManager, surface: &mut DrawingSurface) -> bool {
        match history.undo(surface).unwrap() {
            Some(req) => {
                let decoded = req.decode().await;
                history.apply(surface, decoded)
            }
            None => false,
        }
    }

    async fn run_redo(history: &mut HistoryManager, surface: &mut DrawingSurface) -> bool {
        match history.redo(surface).unwrap() {
            Some(req) => {
                let decoded = req.decode().await;
                history.apply(surface, decoded)
            }
            None => false,
        }
    }

    #[tokio::test]
    async fn test_undo_redo_round_trip_law() {
        let mut surface = DrawingSurface::new(32, 32);
        let mut history = HistoryManager::new();

        // N strokes, each snapshotted at stroke begin.
        let n = 4;
        for i in 0..n {
            history.push_snapshot(&surface).unwrap();
            stroke(&mut surface, 4.0 + i as f32 * 6.0);
        }
        let final_pixels = surface.pixels().to_vec();
        assert!(!surface.is_blank());

        // N undos return to the blank initial state.
        for _ in 0..n {
            assert!(run_undo(&mut history, &mut surface).await);
        }
        assert!(surface.is_blank());
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), n);

        // N redos restore the final drawn state.
        for _ in 0..n {
            assert!(run_redo(&mut history, &mut surface).await);
        }
        assert_eq!(surface.pixels(), final_pixels.as_slice());
        assert_eq!(history.redo_depth(), 0);
    }

    #[tokio::test]
    async fn test_two_stroke_scenario() {
        let mut surface = DrawingSurface::new(32, 32);
        let mut history = HistoryManager::new();

        // Stroke A: snapshot of the blank surface taken first.
        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 8.0);
        let after_a = surface.pixels().to_vec();

        // Stroke B: snapshot of the state after A taken first.
        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 20.0);
        assert_eq!(history.undo_depth(), 2);

        // First undo: surface shows the state after A.
        assert!(run_undo(&mut history, &mut surface).await);
        assert_eq!(surface.pixels(), after_a.as_slice());
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(history.redo_depth(), 1);

        // Second undo: surface blank, undo stack empty.
        assert!(run_undo(&mut history, &mut surface).await);
        assert!(surface.is_blank());
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 2);

        // Redo: surface shows the state after A again.
        assert!(run_redo(&mut history, &mut surface).await);
        assert_eq!(surface.pixels(), after_a.as_slice());
    }

    #[tokio::test]
    async fn test_new_stroke_clears_redo() {
        let mut surface = DrawingSurface::new(32, 32);
        let mut history = HistoryManager::new();

        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 8.0);
        assert!(run_undo(&mut history, &mut surface).await);
        assert_eq!(history.redo_depth(), 1);

        // A new stroke invalidates the redo history.
        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 20.0);
        assert_eq!(history.redo_depth(), 0);

        let before = surface.pixels().to_vec();
        assert!(!run_redo(&mut history, &mut surface).await);
        assert_eq!(surface.pixels(), before.as_slice());
    }

    #[tokio::test]
    async fn test_empty_history_noops() {
        let mut surface = DrawingSurface::new(16, 16);
        let mut history = HistoryManager::new();

        assert!(!run_undo(&mut history, &mut surface).await);
        assert!(!run_redo(&mut history, &mut surface).await);
        assert!(surface.is_blank());
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[tokio::test]
    async fn test_stale_decode_does_not_overwrite_newer_repaint() {
        let mut surface = DrawingSurface::new(32, 32);
        let mut history = HistoryManager::new();

        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 8.0);
        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 20.0);

        // Issue two undos before applying either.
        let first = history.undo(&surface).unwrap().unwrap();
        let second = history.undo(&surface).unwrap().unwrap();
        assert!(first.seq() < second.seq());

        // The later request completes first and wins.
        let second_decoded = second.decode().await;
        assert!(history.apply(&mut surface, second_decoded));
        assert!(surface.is_blank());

        // The superseded decode arrives late and is dropped.
        let first_decoded = first.decode().await;
        assert!(!history.apply(&mut surface, first_decoded));
        assert!(surface.is_blank());
    }

    #[tokio::test]
    async fn test_malformed_snapshot_repaint_is_silent_noop() {
        let mut surface = DrawingSurface::new(16, 16);
        let mut history = HistoryManager::new();

        history.push_snapshot(&surface).unwrap();
        stroke(&mut surface, 8.0);
        let before = surface.pixels().to_vec();

        let req = history.request_for(Snapshot::from_bytes(vec![1, 2, 3]));
        let decoded = req.decode().await;
        assert!(!history.apply(&mut surface, decoded));
        // Last good frame remains displayed.
        assert_eq!(surface.pixels(), before.as_slice());

        // The failed repaint consumed its slot; a fresh undo still works.
        assert!(run_undo(&mut history, &mut surface).await);
        assert!(surface.is_blank());
    }

    #[tokio::test]
    async fn test_geometry_mismatch_frame_is_rejected() {
        let mut surface = DrawingSurface::new(16, 16);
        let mut history = HistoryManager::new();

        let other = DrawingSurface::new(8, 8);
        let req = history.request_for(Snapshot::capture(&other).unwrap());
        let decoded = req.decode().await;
        assert!(!history.apply(&mut surface, decoded));
        assert!(surface.is_blank());
    }
}
