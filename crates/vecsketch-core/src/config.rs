//! Editor configuration.

use crate::history::DEFAULT_MAX_UNDO_HISTORY;
use crate::shapes::SerializableColor;
use crate::tools::DEFAULT_POLYGON_SIDES;
use crate::{CANVAS_HEIGHT, CANVAS_WIDTH};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Pen width for new documents.
pub const DEFAULT_PEN_WIDTH: f64 = 6.0;
/// Animation tick period in milliseconds.
pub const DEFAULT_ANIMATION_PERIOD_MS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid config: {0}")]
    Parse(String),
}

/// Tunable editor settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Export canvas width in pixels.
    pub canvas_width: f64,
    /// Export canvas height in pixels.
    pub canvas_height: f64,
    pub animation_period_ms: u64,
    /// Pen color for new documents, as `#rrggbb`.
    pub pen_color: SerializableColor,
    pub pen_width: f64,
    /// Side count for new regular polygons.
    pub polygon_sides: u32,
    /// Undo states kept before the oldest is dropped.
    pub max_undo_history: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            animation_period_ms: DEFAULT_ANIMATION_PERIOD_MS,
            pen_color: SerializableColor::black(),
            pen_width: DEFAULT_PEN_WIDTH,
            polygon_sides: DEFAULT_POLYGON_SIDES,
            max_undo_history: DEFAULT_MAX_UNDO_HISTORY,
        }
    }
}

impl EditorConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn animation_period(&self) -> Duration {
        Duration::from_millis(self.animation_period_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_size(), Size::new(800.0, 600.0));
        assert_eq!(config.animation_period(), Duration::from_millis(30));
        assert_eq!(config.pen_width, 6.0);
        assert_eq!(config.polygon_sides, 5);
        assert_eq!(config.max_undo_history, 100);
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r##"{"pen_color": "#ff0000", "max_undo_history": 5}"##).unwrap();
        assert_eq!(config.pen_color, SerializableColor::rgb(255, 0, 0));
        assert_eq!(config.max_undo_history, 5);
        assert_eq!(config.pen_width, DEFAULT_PEN_WIDTH);
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vecsketch.json");
        std::fs::write(&path, r#"{"canvas_width": 1024, "animation_period_ms": 16}"#).unwrap();
        let config = EditorConfig::load(&path).unwrap();
        assert_eq!(config.canvas_width, 1024.0);
        assert_eq!(config.animation_period(), Duration::from_millis(16));

        assert!(matches!(EditorConfig::load(&dir.path().join("nope.json")), Err(ConfigError::Io(_))));
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
