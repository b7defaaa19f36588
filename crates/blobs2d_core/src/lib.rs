//! Core engine shared by the blobs2d editor and viewer
//!
//! This crate provides everything needed to edit a sparse tile world without a window:
//! - `TileCatalog` - Tile type definitions with lazily rescaled cached images
//! - `MapStore` - The placed-tile list and its text persistence format
//! - `Viewport` - Camera offset and zoom, screen/grid coordinate conversion
//! - `SelectionState` - Cross-thread handoff of the tile id chosen in the palette
//! - `InputController` - Turns device events into camera, zoom, paint and save actions
//! - `Renderer` - Culls and composites visible tiles into an RGBA frame
//! - `EditorState` - Owns all of the above for one editing session

mod catalog;
mod config;
mod input;
mod map;
mod palette;
mod render;
mod selection;
mod state;
mod viewport;

pub use catalog::{
    placeholder_image, CatalogError, TileCatalog, TileId, TileType, PLACEHOLDER_COLOR,
};
pub use config::{ConfigError, EngineConfig, PaintMode};
pub use input::{EventOutcome, FrameInput, FrameOutcome, InputController, InputEvent, Key};
pub use map::{MapError, MapStore, PlacedTile};
pub use palette::{palette_entries, PaletteEntry, PaletteEvent, PaletteSender, PaletteWorker};
pub use render::{is_on_screen, DrawCommand, FrameStats, Renderer, CLEAR_COLOR};
pub use selection::{SelectionHandle, SelectionState, ShutdownSignal};
pub use state::{EditorState, EngineError};
pub use viewport::{PanKeys, Viewport, DEFAULT_TILE_SIZE, MIN_TILE_SIZE, ZOOM_STEP};
