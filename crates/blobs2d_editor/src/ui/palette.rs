//! Block selector window
//!
//! Shows one button per catalog entry. Clicks and the window close are
//! forwarded to the palette thread, which owns the selection updates.
//!
//! Bevy keeps windows and egui on the main thread, so this window is drawn by
//! the same loop that renders the map and pauses whenever a frame stalls. Only
//! the selection handoff and the shutdown request cross into the `palette`
//! thread; the button list itself is not a separately scheduled loop.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use blobs2d_core::{PaletteEntry, PaletteEvent, PaletteSender, PaletteWorker, TileId};

const BUTTON_SIZE: [f32; 2] = [240.0, 22.0];

/// Plugin drawing the palette window when a palette is running
pub struct PaletteUiPlugin;

impl Plugin for PaletteUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(EguiPrimaryContextPass, render_palette);
    }
}

/// Palette window state and the connection to its thread
#[derive(Resource)]
pub struct PaletteUi {
    sender: PaletteSender,
    worker: Option<PaletteWorker>,
    pub entries: Vec<PaletteEntry>,
    pub open: bool,
    /// Last button clicked, shown as selected
    pub highlighted: Option<TileId>,
}

impl PaletteUi {
    pub fn new(worker: PaletteWorker, entries: Vec<PaletteEntry>) -> Self {
        Self {
            sender: worker.sender(),
            worker: Some(worker),
            entries,
            open: true,
            highlighted: None,
        }
    }

    /// Send a window result to the palette thread
    pub fn apply(&mut self, result: PaletteResult) {
        if let Some(id) = result.activated {
            self.highlighted = Some(id);
            if !self.sender.send(PaletteEvent::Activate(id)) {
                warn!("Palette thread is gone, selection of {} dropped", id);
            }
        }
        if result.closed {
            self.open = false;
            if let Some(worker) = self.worker.take() {
                worker.close();
            }
        }
    }
}

/// What the user did in the palette window this frame
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PaletteResult {
    pub activated: Option<TileId>,
    pub closed: bool,
}

/// Render the block selector window
pub fn render_palette_window(
    ctx: &egui::Context,
    entries: &[PaletteEntry],
    highlighted: Option<TileId>,
) -> PaletteResult {
    let mut result = PaletteResult::default();
    let mut open = true;

    egui::Window::new("Block Selector")
        .open(&mut open)
        .default_pos([8.0, 8.0])
        .resizable(true)
        .show(ctx, |ui| {
            if entries.is_empty() {
                ui.label("No blocks in catalog");
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in entries {
                    let selected = highlighted == Some(entry.id);
                    let button = egui::Button::new(entry.label.as_str()).selected(selected);
                    if ui.add_sized(BUTTON_SIZE, button).clicked() {
                        result.activated = Some(entry.id);
                    }
                }
            });
        });

    result.closed = !open;
    result
}

fn render_palette(mut contexts: EguiContexts, palette: Option<ResMut<PaletteUi>>) {
    let Some(mut palette) = palette else {
        return;
    };
    if !palette.open {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let result = render_palette_window(ctx, &palette.entries, palette.highlighted);
    palette.apply(result);
}
