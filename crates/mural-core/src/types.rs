//! Shared primitive types for the mural system.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Timestamp type used throughout the system (UTC).
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A point on the drawing surface, in pixel coordinates.
///
/// Pointer events arrive in surface-local coordinates; fractional positions
/// are preserved so stroke rasterization can sub-sample segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Compositing mode for new ink.
///
/// `Draw` composites opaque ink over existing pixels; `Erase` removes
/// existing pixels (destination-out) with a wider brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushMode {
    Draw,
    Erase,
}

impl fmt::Display for BrushMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrushMode::Draw => write!(f, "draw"),
            BrushMode::Erase => write!(f, "erase"),
        }
    }
}

/// Kind of media asset resolved from a transcript phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(b.distance(&a), 5.0);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn test_brush_mode_display() {
        assert_eq!(BrushMode::Draw.to_string(), "draw");
        assert_eq!(BrushMode::Erase.to_string(), "erase");
    }

    #[test]
    fn test_media_kind_display() {
        assert_eq!(MediaKind::Image.to_string(), "image");
        assert_eq!(MediaKind::Video.to_string(), "video");
    }

    #[test]
    fn test_media_kind_serde_roundtrip() {
        let json = serde_json::to_string(&MediaKind::Video).unwrap();
        assert_eq!(json, "\"video\"");
        let kind: MediaKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, MediaKind::Video);
    }
}
