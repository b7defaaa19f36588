//! Per-frame input dispatch
//!
//! Front ends translate device input into `InputEvent`s plus the set of held
//! movement keys; `InputController` applies them to an `EditorState`.

use crate::catalog::TileId;
use crate::config::EngineConfig;
use crate::map::PlacedTile;
use crate::state::EditorState;
use crate::viewport::PanKeys;

/// Keys the controller cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    W,
    A,
    S,
    D,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window close request
    Quit,
    /// Mouse wheel notch; positive zooms in
    Wheel(i32),
    /// Left mouse button pressed at a screen position
    LeftClick { x: i64, y: i64 },
    /// Key pressed this frame, with the Ctrl modifier state
    KeyPressed { key: Key, ctrl: bool },
}

/// Everything the front end collected for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub events: Vec<InputEvent>,
    pub held: PanKeys,
}

/// Result of a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Quit,
    Zoomed { tile_size: u32 },
    Painted(PlacedTile),
    Saved { ok: bool },
    Ignored,
}

/// Summary of one frame's input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Caller must exit immediately; nothing after the quit event was applied
    pub quit: bool,
    /// Tile size changed, images need rescaling before the next draw
    pub zoom_changed: bool,
    pub painted: Vec<PlacedTile>,
    /// `Some(ok)` when a save was requested
    pub saved: Option<bool>,
    /// Palette selection picked up at the start of the frame
    pub selection_changed: Option<TileId>,
}

/// Flat event dispatcher for camera, zoom, paint and save
#[derive(Debug, Clone)]
pub struct InputController {
    pan_step: i64,
}

impl Default for InputController {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl InputController {
    pub fn new(pan_step: i64) -> Self {
        Self { pan_step }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pan_step)
    }

    pub fn pan_step(&self) -> i64 {
        self.pan_step
    }

    /// Apply one event
    pub fn handle_event(&self, state: &mut EditorState, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::Quit => EventOutcome::Quit,
            InputEvent::Wheel(delta) => {
                if state.viewport.zoom(delta) {
                    EventOutcome::Zoomed {
                        tile_size: state.viewport.tile_size(),
                    }
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::LeftClick { x, y } => match state.paint_at_screen(x, y) {
                Some(tile) => EventOutcome::Painted(tile),
                None => EventOutcome::Ignored,
            },
            InputEvent::KeyPressed { key: Key::S, ctrl: true } => EventOutcome::Saved {
                ok: state.save_and_report(),
            },
            InputEvent::KeyPressed { .. } => EventOutcome::Ignored,
        }
    }

    /// Move the camera for the keys held this tick
    pub fn apply_held_keys(&self, state: &mut EditorState, held: PanKeys) {
        state.viewport.pan(held, self.pan_step);
    }

    /// Pick up the palette selection, then apply events in order.
    ///
    /// Stops at the first quit event.
    pub fn process_events(&self, state: &mut EditorState, events: &[InputEvent]) -> FrameOutcome {
        let mut outcome = FrameOutcome {
            selection_changed: state.selection.poll(),
            ..Default::default()
        };

        for event in events {
            match self.handle_event(state, *event) {
                EventOutcome::Quit => {
                    outcome.quit = true;
                    break;
                }
                EventOutcome::Zoomed { .. } => outcome.zoom_changed = true,
                EventOutcome::Painted(tile) => outcome.painted.push(tile),
                EventOutcome::Saved { ok } => outcome.saved = Some(ok),
                EventOutcome::Ignored => {}
            }
        }

        outcome
    }

    /// Events first, then held-key panning
    pub fn process_frame(&self, state: &mut EditorState, input: &FrameInput) -> FrameOutcome {
        let outcome = self.process_events(state, &input.events);
        if !outcome.quit {
            self.apply_held_keys(state, input.held);
        }
        outcome
    }
}
