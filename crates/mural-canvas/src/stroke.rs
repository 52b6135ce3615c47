//! Stroke renderer: pointer motion to raster ink.

use mural_core::config::CanvasConfig;
use mural_core::types::{BrushMode, Point};

use crate::surface::{DrawingSurface, InkOp};

/// Brush styling shared by both compositing modes.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle {
    /// Ink color used in draw mode.
    pub ink: [u8; 4],
    /// Brush width in draw mode, in pixels.
    pub draw_width: f32,
    /// Brush width in erase mode, in pixels.
    pub erase_width: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            ink: [0, 0, 0, 255],
            draw_width: 2.0,
            erase_width: 20.0,
        }
    }
}

impl From<&CanvasConfig> for StrokeStyle {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            ink: config.ink_color,
            draw_width: config.draw_width,
            erase_width: config.erase_width,
        }
    }
}

/// Converts pointer motion into ink on an exclusively owned surface.
///
/// Tracks the current pen position between pointer events. A stroke is the
/// span from `begin_stroke` to `end_stroke`; extending with no active stroke
/// is a safe no-op.
#[derive(Debug)]
pub struct StrokeRenderer {
    surface: DrawingSurface,
    style: StrokeStyle,
    mode: BrushMode,
    pen: Option<Point>,
}

impl StrokeRenderer {
    /// Create a renderer over a fresh transparent surface.
    pub fn new(width: u32, height: u32, style: StrokeStyle) -> Self {
        Self {
            surface: DrawingSurface::new(width, height),
            style,
            mode: BrushMode::Draw,
            pen: None,
        }
    }

    /// Start a new path at `point`.
    ///
    /// The history snapshot for this stroke must already have been taken by
    /// the caller (see `HistoryManager::push_snapshot`).
    pub fn begin_stroke(&mut self, point: Point) {
        self.pen = Some(point);
    }

    /// Append a line segment from the current pen position to `point`.
    ///
    /// No-op if no stroke is active.
    pub fn extend_stroke(&mut self, point: Point) {
        let Some(prev) = self.pen else {
            return;
        };
        let (radius, op) = match self.mode {
            BrushMode::Draw => (self.style.draw_width / 2.0, InkOp::Paint(self.style.ink)),
            BrushMode::Erase => (self.style.erase_width / 2.0, InkOp::Erase),
        };
        self.surface.paint_segment(prev, point, radius, op);
        self.pen = Some(point);
    }

    /// Finalize the current path so subsequent draws start fresh.
    pub fn end_stroke(&mut self) {
        self.pen = None;
    }

    /// Whether a stroke is currently active.
    pub fn is_stroking(&self) -> bool {
        self.pen.is_some()
    }

    pub fn set_mode(&mut self, mode: BrushMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    /// Wipe the entire surface to transparent. Not recorded in history.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut DrawingSurface {
        &mut self.surface
    }
}
