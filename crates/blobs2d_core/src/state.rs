//! Session state owned by the render loop

use crate::catalog::{CatalogError, TileCatalog, TileId};
use crate::config::{EngineConfig, PaintMode};
use crate::map::{MapError, MapStore, PlacedTile};
use crate::render::{FrameStats, Renderer};
use crate::selection::SelectionState;
use crate::viewport::Viewport;
use image::RgbaImage;
use std::path::PathBuf;

/// Selection used when the catalog is empty and nothing was configured
const FALLBACK_SELECTION: TileId = 1;

/// Startup failure; the session cannot begin
#[derive(Debug)]
pub enum EngineError {
    Catalog(CatalogError),
    Map(MapError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Catalog(e) => write!(f, "Failed to load tile catalog: {}", e),
            EngineError::Map(e) => write!(f, "Failed to load map: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Catalog(e) => Some(e),
            EngineError::Map(e) => Some(e),
        }
    }
}

impl From<CatalogError> for EngineError {
    fn from(e: CatalogError) -> Self {
        EngineError::Catalog(e)
    }
}

impl From<MapError> for EngineError {
    fn from(e: MapError) -> Self {
        EngineError::Map(e)
    }
}

/// Everything one editing session works on
#[derive(Debug, Clone)]
pub struct EditorState {
    pub catalog: TileCatalog,
    pub map: MapStore,
    pub viewport: Viewport,
    pub selection: SelectionState,
    pub paint_mode: PaintMode,
    /// Destination for saves
    pub map_path: PathBuf,
}

impl EditorState {
    pub fn new(catalog: TileCatalog, map: MapStore, config: &EngineConfig) -> Self {
        let initial = config
            .default_selection
            .or_else(|| catalog.first_id())
            .unwrap_or(FALLBACK_SELECTION);

        Self {
            catalog,
            map,
            viewport: Viewport::new(config.initial_tile_size),
            selection: SelectionState::new(initial),
            paint_mode: config.paint_mode,
            map_path: config.map_path.clone(),
        }
    }

    /// Load catalog and map, then build the initial image cache.
    ///
    /// Blocks on file and image I/O; call before the frame loop starts.
    pub fn load(config: &EngineConfig) -> Result<Self, EngineError> {
        let catalog = TileCatalog::load(&config.catalog_path)?;
        let map = MapStore::load(&config.map_path)?;
        log::info!(
            "Loaded {} tile types from {} and {} tiles from {}",
            catalog.len(),
            config.catalog_path.display(),
            map.len(),
            config.map_path.display()
        );

        let missing = map.missing_tile_ids(&catalog);
        if !missing.is_empty() {
            log::warn!(
                "Map references tile ids missing from the catalog: {:?}; they will render as placeholders",
                missing
            );
        }

        let mut state = Self::new(catalog, map, config);
        state.prepare_frame();
        Ok(state)
    }

    /// Id a click paints with under the current mode
    pub fn paint_id(&self) -> TileId {
        match self.paint_mode {
            PaintMode::Palette => self.selection.selected(),
            PaintMode::FixedId(id) => id,
        }
    }

    /// Repaint the tile under a screen pixel.
    ///
    /// Returns the updated tile, or `None` when no tile occupies that cell
    /// or the pixel has no grid cell.
    pub fn paint_at_screen(&mut self, px: i64, py: i64) -> Option<PlacedTile> {
        let (gx, gy) = self.viewport.screen_to_grid(px, py)?;
        let tile_id = self.paint_id();
        self.map.paint(gx, gy, tile_id)?;
        Some(PlacedTile::new(gx, gy, tile_id))
    }

    /// Write the map to `map_path`
    pub fn save(&self) -> Result<(), MapError> {
        self.map.save(&self.map_path)
    }

    /// Save and log the outcome. Failures do not end the session.
    pub fn save_and_report(&self) -> bool {
        match self.save() {
            Ok(()) => {
                log::info!("Map saved to {}", self.map_path.display());
                true
            }
            Err(e) => {
                log::error!("Failed to save map to {}: {}", self.map_path.display(), e);
                false
            }
        }
    }

    /// Bring the image cache in line with the current tile size.
    ///
    /// Returns true if images were rescaled.
    pub fn prepare_frame(&mut self) -> bool {
        self.catalog.ensure_scaled(self.viewport.tile_size())
    }

    /// Compose one frame into `canvas`
    pub fn render(&mut self, renderer: &mut Renderer, canvas: &mut RgbaImage) -> FrameStats {
        self.prepare_frame();
        renderer.draw_frame(canvas, &self.map, &self.catalog, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(paint_mode: PaintMode) -> EditorState {
        let catalog = TileCatalog::parse("grass, g.png, 1\nstone, s.png, 2\n").unwrap();
        let map = MapStore::parse("x0 y0 z1 e\nx1 y0 z1 e\n").unwrap();
        let config = EngineConfig {
            paint_mode,
            ..EngineConfig::editor()
        };
        EditorState::new(catalog, map, &config)
    }

    #[test]
    fn test_default_selection_is_first_catalog_id() {
        let state = state(PaintMode::Palette);
        assert_eq!(state.selection.selected(), 1);

        let empty = EditorState::new(
            TileCatalog::new(),
            MapStore::new(),
            &EngineConfig::editor(),
        );
        assert_eq!(empty.selection.selected(), FALLBACK_SELECTION);
    }

    #[test]
    fn test_paint_uses_palette_selection() {
        let mut state = state(PaintMode::Palette);
        state.selection.handle().select(2);
        state.selection.poll();

        let painted = state.paint_at_screen(40, 10).unwrap();
        assert_eq!(painted, PlacedTile::new(1, 0, 2));
        assert_eq!(state.map.tiles()[0].tile_id, 1);
        assert_eq!(state.map.tiles()[1].tile_id, 2);
    }

    #[test]
    fn test_paint_fixed_id_ignores_selection() {
        let mut state = state(PaintMode::FixedId(3));
        state.selection.handle().select(2);
        state.selection.poll();

        assert_eq!(state.paint_id(), 3);
        assert_eq!(state.paint_at_screen(0, 0).unwrap().tile_id, 3);
    }

    #[test]
    fn test_paint_empty_cell_leaves_map_unchanged() {
        let mut state = state(PaintMode::Palette);
        let before = state.map.tiles().to_vec();

        assert!(state.paint_at_screen(5, 100).is_none());
        assert!(state.paint_at_screen(-1, 0).is_none());
        assert_eq!(state.map.tiles(), before.as_slice());
    }

    #[test]
    fn test_far_record_renders_without_panic() {
        let catalog = TileCatalog::parse("grass, g.png, 1\n").unwrap();
        let map = MapStore::parse("x400000000000000000 y0 z1 e\nx0 y0 z1 e\n").unwrap();
        let mut state = EditorState::new(catalog, map, &EngineConfig::editor());
        let mut canvas = RgbaImage::new(64, 64);

        let stats = state.render(&mut Renderer::new(), &mut canvas);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.culled, 1);
        state.viewport.camera_x = 1;
        assert!(state.paint_at_screen(i64::MAX, 0).is_none());
    }

    #[test]
    fn test_load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            catalog_path: dir.path().join("blocks.txt"),
            map_path: dir.path().join("map.txt"),
            ..EngineConfig::editor()
        };

        assert!(matches!(
            EditorState::load(&config),
            Err(EngineError::Catalog(CatalogError::IoError(_)))
        ));

        std::fs::write(&config.catalog_path, "grass, g.png, 1\n").unwrap();
        std::fs::write(&config.map_path, "x0 y0 z1\n").unwrap();
        assert!(matches!(
            EditorState::load(&config),
            Err(EngineError::Map(MapError::ParseError { line: 1, .. }))
        ));
    }

    #[test]
    fn test_save_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state(PaintMode::Palette);
        state.map_path = dir.path().join("no_such_dir").join("map.txt");

        assert!(!state.save_and_report());
        assert!(state.paint_at_screen(0, 0).is_some());

        state.map_path = dir.path().join("map.txt");
        assert!(state.save_and_report());
    }
}
