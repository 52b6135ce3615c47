//! The persistent raster drawing surface.
//!
//! An RGBA8 pixel buffer of fixed dimensions, mutated in place by the stroke
//! renderer and the history repaint path. Ink is applied as capsule-shaped
//! segment stamps: every pixel within the brush radius of the segment is
//! composited, which gives round caps and joins without any path machinery.

use mural_core::types::Point;

use crate::error::CanvasError;
use crate::snapshot::DecodedFrame;

/// Compositing rule for a segment stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkOp {
    /// Source-over composite of the given RGBA ink.
    Paint([u8; 4]),
    /// Destination-out: existing pixels under the brush are removed.
    Erase,
}

/// A raster bitmap of fixed dimensions, mutable in place.
///
/// Pixels are stored row-major as RGBA8. A freshly created surface is fully
/// transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DrawingSurface {
    /// Create a transparent surface of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA value at `(x, y)`, or transparent if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Wipe the entire surface back to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Replace the surface content with a decoded snapshot frame.
    ///
    /// Fails if the frame dimensions do not match the surface.
    pub fn overwrite(&mut self, frame: &DecodedFrame) -> Result<(), CanvasError> {
        if frame.width != self.width || frame.height != self.height {
            return Err(CanvasError::Geometry {
                expected_width: self.width,
                expected_height: self.height,
                width: frame.width,
                height: frame.height,
            });
        }
        self.pixels.copy_from_slice(&frame.pixels);
        Ok(())
    }

    /// Composite a line segment from `from` to `to` with the given brush
    /// radius and compositing rule.
    ///
    /// Walks the bounding box of the segment expanded by the radius and
    /// composites every pixel whose center lies within the radius of the
    /// segment. Degenerate segments (from == to) stamp a single disc.
    pub fn paint_segment(&mut self, from: Point, to: Point, radius: f32, op: InkOp) {
        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + radius).ceil().min(self.width as f32 - 1.0);
        let max_y = (from.y.max(to.y) + radius).ceil().min(self.height as f32 - 1.0);
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }

        for y in min_y..=max_y as u32 {
            for x in min_x..=max_x as u32 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    self.composite(x, y, op);
                }
            }
        }
    }

    fn composite(&mut self, x: u32, y: u32, op: InkOp) {
        let i = ((y * self.width + x) * 4) as usize;
        match op {
            InkOp::Paint(ink) => {
                let sa = ink[3] as u32;
                if sa == 255 {
                    self.pixels[i..i + 4].copy_from_slice(&ink);
                    return;
                }
                // Source-over for translucent ink.
                let da = self.pixels[i + 3] as u32;
                let out_a = sa + da * (255 - sa) / 255;
                for c in 0..3 {
                    let sc = ink[c] as u32;
                    let dc = self.pixels[i + c] as u32;
                    let out = if out_a == 0 {
                        0
                    } else {
                        (sc * sa + dc * da * (255 - sa) / 255) / out_a
                    };
                    self.pixels[i + c] = out as u8;
                }
                self.pixels[i + 3] = out_a as u8;
            }
            InkOp::Erase => {
                self.pixels[i..i + 4].copy_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
}

/// Distance from point `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let len_sq = a.distance(&b).powi(2);
    if len_sq == 0.0 {
        return p.distance(&a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance(&proj)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_new_surface_is_blank() {
        let surface = DrawingSurface::new(16, 16);
        assert!(surface.is_blank());
        assert_eq!(surface.pixels().len(), 16 * 16 * 4);
    }

    #[test]
    fn test_paint_segment_marks_pixels() {
        let mut surface = DrawingSurface::new(32, 32);
        surface.paint_segment(
            Point::new(4.0, 16.0),
            Point::new(28.0, 16.0),
            1.0,
            InkOp::Paint(BLACK),
        );
        assert!(!surface.is_blank());
        assert_eq!(surface.pixel(16, 16), BLACK);
        // Far from the segment stays transparent.
        assert_eq!(surface.pixel(16, 2), [0; 4]);
    }

    #[test]
    fn test_degenerate_segment_stamps_disc() {
        let mut surface = DrawingSurface::new(16, 16);
        let p = Point::new(8.0, 8.0);
        surface.paint_segment(p, p, 3.0, InkOp::Paint(BLACK));
        assert_eq!(surface.pixel(8, 8), BLACK);
        assert_eq!(surface.pixel(0, 0), [0; 4]);
    }

    #[test]
    fn test_erase_removes_existing_ink() {
        let mut surface = DrawingSurface::new(32, 32);
        let from = Point::new(4.0, 16.0);
        let to = Point::new(28.0, 16.0);
        surface.paint_segment(from, to, 1.0, InkOp::Paint(BLACK));
        assert!(!surface.is_blank());

        // Erase with a wider brush along the same path.
        surface.paint_segment(from, to, 10.0, InkOp::Erase);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_segment_outside_bounds_is_safe() {
        let mut surface = DrawingSurface::new(8, 8);
        surface.paint_segment(
            Point::new(-50.0, -50.0),
            Point::new(-40.0, -40.0),
            2.0,
            InkOp::Paint(BLACK),
        );
        assert!(surface.is_blank());

        surface.paint_segment(
            Point::new(100.0, 100.0),
            Point::new(200.0, 200.0),
            2.0,
            InkOp::Paint(BLACK),
        );
        assert!(surface.is_blank());
    }

    #[test]
    fn test_clear_wipes_surface() {
        let mut surface = DrawingSurface::new(8, 8);
        surface.paint_segment(
            Point::new(0.0, 0.0),
            Point::new(8.0, 8.0),
            2.0,
            InkOp::Paint(BLACK),
        );
        assert!(!surface.is_blank());
        surface.clear();
        assert!(surface.is_blank());
    }

    #[test]
    fn test_overwrite_rejects_mismatched_geometry() {
        let mut surface = DrawingSurface::new(8, 8);
        let frame = DecodedFrame {
            width: 4,
            height: 4,
            pixels: vec![0; 4 * 4 * 4],
        };
        assert!(matches!(
            surface.overwrite(&frame),
            Err(CanvasError::Geometry { .. })
        ));
    }

    #[test]
    fn test_pixel_out_of_bounds_is_transparent() {
        let surface = DrawingSurface::new(4, 4);
        assert_eq!(surface.pixel(10, 10), [0; 4]);
    }
}
