use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{MuralError, Result};

/// Top-level configuration for the mural application.
///
/// Loaded from `~/.mural/config.toml` by default. Each section corresponds
/// to one subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MuralConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

impl MuralConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MuralConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| MuralError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Drawing surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Ink color as RGBA components.
    pub ink_color: [u8; 4],
    /// Brush width in draw mode, in pixels.
    pub draw_width: f32,
    /// Brush width in erase mode, in pixels. Wider than draw by design.
    pub erase_width: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            ink_color: [0, 0, 0, 255],
            draw_width: 2.0,
            erase_width: 20.0,
        }
    }
}

/// Speech capture configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Recognition locale, e.g. "en-US".
    pub locale: String,
    /// Delay before restarting a self-terminated session, in milliseconds.
    pub restart_delay_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            restart_delay_ms: 250,
        }
    }
}

/// Media resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Directory containing image assets.
    pub image_dir: String,
    /// Directory containing video assets.
    pub video_dir: String,
    /// File extension for image assets (without the dot).
    pub image_ext: String,
    /// File extension for video assets (without the dot).
    pub video_ext: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_dir: "assets/images".to_string(),
            video_dir: "assets/videos".to_string(),
            image_ext: "jpeg".to_string(),
            video_ext: "mp4".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MuralConfig::default();
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 500);
        assert_eq!(config.canvas.ink_color, [0, 0, 0, 255]);
        assert_eq!(config.canvas.draw_width, 2.0);
        assert_eq!(config.canvas.erase_width, 20.0);
        assert_eq!(config.speech.locale, "en-US");
        assert_eq!(config.media.image_ext, "jpeg");
        assert_eq!(config.media.video_ext, "mp4");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = MuralConfig::default();
        config.canvas.width = 1024;
        config.speech.locale = "nb-NO".to_string();
        config.save(&path).unwrap();

        let loaded = MuralConfig::load(&path).unwrap();
        assert_eq!(loaded.canvas.width, 1024);
        assert_eq!(loaded.speech.locale, "nb-NO");
        // Untouched sections keep defaults.
        assert_eq!(loaded.media.image_dir, "assets/images");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = MuralConfig::load(Path::new("/nonexistent/mural.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = MuralConfig::load_or_default(Path::new("/nonexistent/mural.toml"));
        assert_eq!(config.canvas.width, 800);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: MuralConfig = toml::from_str(
            r#"
            [canvas]
            width = 640
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 640);
        assert_eq!(config.canvas.height, 500);
        assert_eq!(config.speech.restart_delay_ms, 250);
    }
}
