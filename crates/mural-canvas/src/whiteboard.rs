//! Whiteboard facade tying the stroke renderer to the history manager.
//!
//! This is the canvas subsystem's public entry point: pointer events map to
//! stroke operations with the snapshot discipline applied (snapshot before
//! ink), and undo/redo are driven issue -> decode -> apply so repaints are
//! serialized against any active stroke.

use mural_core::config::CanvasConfig;
use mural_core::types::{BrushMode, Point};

use crate::error::CanvasError;
use crate::history::HistoryManager;
use crate::stroke::{StrokeRenderer, StrokeStyle};
use crate::surface::DrawingSurface;

/// An interactive drawing surface with snapshot-based undo/redo.
#[derive(Debug)]
pub struct Whiteboard {
    renderer: StrokeRenderer,
    history: HistoryManager,
}

impl Whiteboard {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            renderer: StrokeRenderer::new(config.width, config.height, StrokeStyle::from(config)),
            history: HistoryManager::new(),
        }
    }

    /// Pointer press: snapshot the pre-stroke state, then begin the stroke.
    pub fn pointer_pressed(&mut self, point: Point) -> Result<(), CanvasError> {
        self.history.push_snapshot(self.renderer.surface())?;
        self.renderer.begin_stroke(point);
        Ok(())
    }

    /// Pointer move while pressed: extend the active stroke.
    ///
    /// Safe no-op when no stroke is active.
    pub fn pointer_moved(&mut self, point: Point) {
        self.renderer.extend_stroke(point);
    }

    /// Pointer release: finalize the stroke.
    pub fn pointer_released(&mut self) {
        self.renderer.end_stroke();
    }

    /// Undo the most recent stroke.
    ///
    /// Any active stroke is finalized first so the repaint cannot interleave
    /// with in-flight ink. Returns `true` if the surface was repainted.
    pub async fn undo(&mut self) -> Result<bool, CanvasError> {
        self.renderer.end_stroke();
        let Some(request) = self.history.undo(self.renderer.surface())? else {
            return Ok(false);
        };
        let decoded = request.decode().await;
        Ok(self.history.apply(self.renderer.surface_mut(), decoded))
    }

    /// Redo the most recently undone stroke. Counterpart of [`Whiteboard::undo`].
    pub async fn redo(&mut self) -> Result<bool, CanvasError> {
        self.renderer.end_stroke();
        let Some(request) = self.history.redo(self.renderer.surface())? else {
            return Ok(false);
        };
        let decoded = request.decode().await;
        Ok(self.history.apply(self.renderer.surface_mut(), decoded))
    }

    pub fn set_mode(&mut self, mode: BrushMode) {
        self.renderer.set_mode(mode);
    }

    pub fn mode(&self) -> BrushMode {
        self.renderer.mode()
    }

    /// Toggle between draw and erase, returning the new mode.
    pub fn toggle_erase(&mut self) -> BrushMode {
        let next = match self.renderer.mode() {
            BrushMode::Draw => BrushMode::Erase,
            BrushMode::Erase => BrushMode::Draw,
        };
        self.renderer.set_mode(next);
        next
    }

    /// Wipe the surface. Deliberately not pushed to history: a full wipe is
    /// not undoable while individual strokes are.
    pub fn clear_surface(&mut self) {
        self.renderer.clear();
    }

    pub fn surface(&self) -> &DrawingSurface {
        self.renderer.surface()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }
}
