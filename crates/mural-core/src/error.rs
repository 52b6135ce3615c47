use thiserror::Error;

/// Top-level error type for the mural system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for MuralError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MuralError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Canvas error: {0}")]
    Canvas(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Speech error: {0}")]
    Speech(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MuralError {
    fn from(err: toml::de::Error) -> Self {
        MuralError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for MuralError {
    fn from(err: toml::ser::Error) -> Self {
        MuralError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MuralError {
    fn from(err: serde_json::Error) -> Self {
        MuralError::Serialization(err.to_string())
    }
}

/// Convenience result type used throughout the mural crates.
pub type Result<T> = std::result::Result<T, MuralError>;
