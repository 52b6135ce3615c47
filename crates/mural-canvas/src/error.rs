//! Error types for the canvas subsystem.

use mural_core::error::MuralError;

/// Errors from surface, snapshot, and history operations.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("Snapshot encode failed: {0}")]
    Encode(String),
    #[error("Snapshot decode failed: {0}")]
    Decode(String),
    #[error("Surface geometry mismatch: expected {expected_width}x{expected_height}, got {width}x{height}")]
    Geometry {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },
}

impl From<CanvasError> for MuralError {
    fn from(err: CanvasError) -> Self {
        match err {
            CanvasError::Encode(_) | CanvasError::Decode(_) => {
                MuralError::Snapshot(err.to_string())
            }
            CanvasError::Geometry { .. } => MuralError::Canvas(err.to_string()),
        }
    }
}
