//! Engine configuration and its JSON file form

use crate::catalog::TileId;
use crate::viewport::{DEFAULT_TILE_SIZE, MIN_TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where a left click gets its tile id from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaintMode {
    /// Paint with whatever the palette last selected
    Palette,
    /// Always paint the same id; no palette is shown
    FixedId(TileId),
}

impl PaintMode {
    pub fn uses_palette(&self) -> bool {
        matches!(self, PaintMode::Palette)
    }
}

/// Settings for one editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tile type definitions (`name, image_path, id` per line)
    pub catalog_path: PathBuf,
    /// Placed tiles, also the save destination
    pub map_path: PathBuf,
    pub paint_mode: PaintMode,
    /// Tile size in pixels at startup
    pub initial_tile_size: u32,
    /// Camera movement per fixed tick for each held direction key
    pub pan_step: i64,
    /// Initial palette selection. Defaults to the first catalog id.
    pub default_selection: Option<TileId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::editor()
    }
}

impl EngineConfig {
    /// Palette-driven editor settings
    pub fn editor() -> Self {
        Self {
            catalog_path: PathBuf::from("block/blocks.txt"),
            map_path: PathBuf::from("maps/testmap.txt"),
            paint_mode: PaintMode::Palette,
            initial_tile_size: DEFAULT_TILE_SIZE,
            pan_step: 2,
            default_selection: None,
        }
    }

    /// Viewer settings: clicks always paint tile 3, slower panning
    pub fn viewer() -> Self {
        Self {
            paint_mode: PaintMode::FixedId(3),
            pan_step: 1,
            ..Self::editor()
        }
    }

    /// Load configuration from a JSON file. Missing fields take the editor defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file_over(path, &Self::default())
    }

    /// Load configuration from a JSON file. Missing fields are taken from `base`.
    pub fn from_file_over(path: &Path, base: &Self) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let overlay: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let serde_json::Value::Object(fields) = overlay else {
            return Err(ConfigError::ParseError(
                "expected a JSON object at the top level".to_string(),
            ));
        };

        let mut merged =
            serde_json::to_value(base).map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        if let serde_json::Value::Object(target) = &mut merged {
            target.extend(fields);
        }

        let mut config: Self =
            serde_json::from_value(merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.initial_tile_size = config.initial_tile_size.max(MIN_TILE_SIZE);
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_preset() {
        let viewer = EngineConfig::viewer();
        assert_eq!(viewer.paint_mode, PaintMode::FixedId(3));
        assert_eq!(viewer.pan_step, 1);
        assert!(!viewer.paint_mode.uses_palette());
        assert_eq!(viewer.map_path, EngineConfig::editor().map_path);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs2d.json");
        std::fs::write(
            &path,
            r#"{ "map_path": "maps/other.txt", "paint_mode": { "FixedId": 9 }, "initial_tile_size": 1 }"#,
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.map_path, PathBuf::from("maps/other.txt"));
        assert_eq!(config.paint_mode, PaintMode::FixedId(9));
        assert_eq!(config.initial_tile_size, MIN_TILE_SIZE);
        assert_eq!(config.catalog_path, PathBuf::from("block/blocks.txt"));
    }

    #[test]
    fn test_file_over_viewer_keeps_viewer_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs2d.json");
        std::fs::write(&path, r#"{ "catalog_path": "assets/blocks.txt" }"#).unwrap();

        let config = EngineConfig::from_file_over(&path, &EngineConfig::viewer()).unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("assets/blocks.txt"));
        assert_eq!(config.paint_mode, PaintMode::FixedId(3));
        assert_eq!(config.pan_step, 1);
    }

    #[test]
    fn test_non_object_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs2d.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = EngineConfig {
            default_selection: Some(4),
            ..EngineConfig::viewer()
        };
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_corrupt_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
