//! Mural Core crate - Shared types, errors, configuration, and domain events.
//!
//! Every other mural crate depends on this one. It defines the top-level
//! `MuralError`, the sectioned TOML configuration, the geometry and media
//! primitives shared between the canvas and media subsystems, and the
//! serializable `BoardEvent` enum consumed by the presentation layer.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::MuralConfig;
pub use error::{MuralError, Result};
pub use events::BoardEvent;
pub use types::{BrushMode, MediaKind, Point, Timestamp};
