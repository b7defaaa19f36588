//! Editor UI components using bevy_egui

mod palette;

pub use palette::{render_palette_window, PaletteResult, PaletteUi, PaletteUiPlugin};
