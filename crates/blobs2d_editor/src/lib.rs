//! blobs2d_editor - Bevy front end for blobs2d tile worlds
//!
//! One engine serves both programs:
//! - the editor paints with whatever the palette window selected
//! - the viewer paints a fixed tile id and shows no palette
//!
//! # Usage
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use blobs2d_editor::{default_plugins, EditorPlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(default_plugins("blobs2d"))
//!         .add_plugins(EditorPlugin::editor().with_map_path("maps/level2.txt"))
//!         .run();
//! }
//! ```

pub mod render;
pub mod settings;
pub mod tools;
pub mod ui;

pub use blobs2d_core;

use bevy::app::PluginGroupBuilder;
use bevy::image::{ImageFilterMode, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_egui::EguiPlugin;
use blobs2d_core::{
    palette_entries, EditorState, EngineConfig, InputController, PaintMode, PaletteWorker,
    ShutdownSignal,
};
use std::path::PathBuf;

use render::FrameRenderPlugin;
use tools::EditorToolsPlugin;
use ui::{PaletteUi, PaletteUiPlugin};

/// Initial window size in logical pixels
pub const WINDOW_SIZE: (u32, u32) = (800, 600);

/// Fixed tick rate for held-key camera movement
pub const PAN_TICK_HZ: f64 = 60.0;

/// Bevy's default plugins configured for pixel-exact tile drawing
pub fn default_plugins(title: &str) -> PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: title.to_string(),
                // Frame is composed in logical pixels; keep them 1:1 with the screen
                resolution: WindowResolution::new(WINDOW_SIZE.0, WINDOW_SIZE.1)
                    .with_scale_factor_override(1.0),
                resizable: true,
                ..default()
            }),
            // Close requests are handled as quit events by the input system
            close_when_requested: false,
            ..default()
        })
        .set(ImagePlugin {
            default_sampler: ImageSamplerDescriptor {
                mag_filter: ImageFilterMode::Nearest,
                min_filter: ImageFilterMode::Nearest,
                mipmap_filter: ImageFilterMode::Nearest,
                ..default()
            },
        })
}

/// Settings given in code; these take precedence over configuration files
#[derive(Clone, Debug, Default)]
pub struct EditorStateConfig {
    pub catalog_path: Option<PathBuf>,
    pub map_path: Option<PathBuf>,
    pub paint_mode: Option<PaintMode>,
    pub initial_tile_size: Option<u32>,
}

impl EditorStateConfig {
    /// Overwrite the fields that were set
    pub fn apply(&self, config: &mut EngineConfig) {
        if let Some(path) = &self.catalog_path {
            config.catalog_path = path.clone();
        }
        if let Some(path) = &self.map_path {
            config.map_path = path.clone();
        }
        if let Some(mode) = self.paint_mode {
            config.paint_mode = mode;
        }
        if let Some(size) = self.initial_tile_size {
            config.initial_tile_size = size;
        }
    }
}

/// Main editor plugin
///
/// # Example
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use blobs2d_editor::{default_plugins, EditorPlugin};
/// use blobs2d_editor::blobs2d_core::PaintMode;
///
/// App::new()
///     .add_plugins(default_plugins("blobs2d"))
///     .add_plugins(
///         EditorPlugin::editor()
///             .with_catalog_path("block/blocks.txt")
///             .with_paint_mode(PaintMode::FixedId(2))
///             .with_initial_tile_size(16),
///     )
///     .run();
/// ```
pub struct EditorPlugin {
    /// Defaults used for anything the config file and overrides leave unset
    pub preset: EngineConfig,
    /// Whether to read `blobs2d.json` / the user config file
    pub load_settings: bool,
    pub initial_state: EditorStateConfig,
}

impl Default for EditorPlugin {
    fn default() -> Self {
        Self::editor()
    }
}

impl EditorPlugin {
    /// Palette-driven editor
    pub fn editor() -> Self {
        Self::with_preset(EngineConfig::editor())
    }

    /// Viewer: fixed paint id, no palette
    pub fn viewer() -> Self {
        Self::with_preset(EngineConfig::viewer())
    }

    pub fn with_preset(preset: EngineConfig) -> Self {
        Self {
            preset,
            load_settings: true,
            initial_state: EditorStateConfig::default(),
        }
    }

    /// Skip configuration files and use the preset plus overrides only
    pub fn without_settings_files(mut self) -> Self {
        self.load_settings = false;
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.initial_state.catalog_path = Some(path.into());
        self
    }

    pub fn with_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.initial_state.map_path = Some(path.into());
        self
    }

    pub fn with_paint_mode(mut self, mode: PaintMode) -> Self {
        self.initial_state.paint_mode = Some(mode);
        self
    }

    pub fn with_initial_tile_size(mut self, size: u32) -> Self {
        self.initial_state.initial_tile_size = Some(size);
        self
    }

    /// Preset, then configuration file, then code overrides
    pub fn resolve_config(&self) -> EngineConfig {
        let mut config = if self.load_settings {
            settings::load_config(&self.preset)
        } else {
            self.preset.clone()
        };
        self.initial_state.apply(&mut config);
        config
    }
}

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        let config = self.resolve_config();

        // Startup load failures are fatal: nothing to edit without catalog and map
        let state = match EditorState::load(&config) {
            Ok(state) => state,
            Err(e) => {
                bevy::log::error!("{}", e);
                std::process::exit(1);
            }
        };

        let shutdown = ShutdownSignal::new();
        if config.paint_mode.uses_palette() {
            match PaletteWorker::spawn(state.selection.handle(), shutdown.clone()) {
                Ok(worker) => {
                    app.insert_resource(PaletteUi::new(worker, palette_entries(&state.catalog)));
                }
                Err(e) => bevy::log::error!("Failed to start palette thread: {}", e),
            }
        }

        app.add_plugins(EguiPlugin::default())
            .add_plugins(EditorToolsPlugin)
            .add_plugins(FrameRenderPlugin)
            .add_plugins(PaletteUiPlugin)
            .insert_resource(Time::<Fixed>::from_hz(PAN_TICK_HZ))
            .insert_resource(EditorSession {
                controller: InputController::from_config(&config),
                state,
            })
            .insert_resource(Shutdown(shutdown));
    }
}

/// The engine state and its input dispatcher, owned by the render loop
#[derive(Resource)]
pub struct EditorSession {
    pub state: EditorState,
    pub controller: InputController,
}

/// Raised by the palette thread when its window closes
#[derive(Resource, Clone)]
pub struct Shutdown(pub ShutdownSignal);
