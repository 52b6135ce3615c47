//! Immutable PNG-encoded snapshots of the drawing surface.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::CanvasError;
use crate::surface::DrawingSurface;

/// An immutable encoded copy of the surface's pixel content at one instant.
///
/// Snapshots are PNG-compressed in memory. Once created they are never
/// mutated; repainting decodes into a fresh `DecodedFrame`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    data: Vec<u8>,
}

/// Decoded snapshot content ready to be written back to a surface.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixel data.
    pub pixels: Vec<u8>,
}

impl Snapshot {
    /// Capture the current surface content into an encoded snapshot.
    pub fn capture(surface: &DrawingSurface) -> Result<Self, CanvasError> {
        let img = RgbaImage::from_raw(
            surface.width(),
            surface.height(),
            surface.pixels().to_vec(),
        )
        .ok_or_else(|| CanvasError::Encode("pixel buffer does not match dimensions".into()))?;

        let mut data = Vec::new();
        img.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
            .map_err(|e| CanvasError::Encode(e.to_string()))?;
        Ok(Self { data })
    }

    /// Construct a snapshot from raw encoded bytes.
    ///
    /// No validation is performed; undecodable bytes surface later as a
    /// `CanvasError::Decode` from [`Snapshot::decode`].
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode the snapshot back into raw pixels.
    pub fn decode(&self) -> Result<DecodedFrame, CanvasError> {
        let img = image::load_from_memory_with_format(&self.data, ImageFormat::Png)
            .map_err(|e| CanvasError::Decode(e.to_string()))?
            .to_rgba8();
        Ok(DecodedFrame {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        })
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
