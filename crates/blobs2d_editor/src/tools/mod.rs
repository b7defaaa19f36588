//! Viewport input: keyboard, mouse and window events into engine input
//!
//! Discrete events (clicks, wheel, shortcuts, close) are handled once per frame.
//! Held WASD movement runs on the fixed timestep so panning speed does not
//! depend on the display refresh rate.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowCloseRequested};
use bevy_egui::EguiContexts;
use blobs2d_core::{InputEvent, Key, PanKeys};

use crate::{EditorSession, Shutdown};

/// Plugin for editor input handling
pub struct EditorToolsPlugin;

impl Plugin for EditorToolsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (handle_viewport_input, exit_on_shutdown).chain())
            .add_systems(FixedUpdate, pan_camera);
    }
}

/// Map a Bevy key code to the keys the engine understands
pub fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        _ => Key::Other,
    }
}

/// Movement keys currently held
pub fn pan_keys(keyboard: &ButtonInput<KeyCode>) -> PanKeys {
    PanKeys {
        up: keyboard.pressed(KeyCode::KeyW),
        down: keyboard.pressed(KeyCode::KeyS),
        left: keyboard.pressed(KeyCode::KeyA),
        right: keyboard.pressed(KeyCode::KeyD),
    }
}

/// One zoom step per wheel event, in the direction of its sign
pub fn wheel_notch(delta_y: f32) -> i32 {
    if delta_y > 0.0 {
        1
    } else if delta_y < 0.0 {
        -1
    } else {
        0
    }
}

/// Collect this frame's events and apply them to the session
fn handle_viewport_input(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut scroll_events: MessageReader<MouseWheel>,
    mut close_requests: MessageReader<WindowCloseRequested>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let mut events = Vec::new();

    if close_requests.read().count() > 0 {
        events.push(InputEvent::Quit);
    }

    // Clicks and scrolling over the palette window belong to egui
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area() || ctx.is_using_pointer())
        .unwrap_or(false);

    for event in scroll_events.read() {
        if over_ui {
            continue;
        }
        let notch = wheel_notch(event.y);
        if notch != 0 {
            events.push(InputEvent::Wheel(notch));
        }
    }

    if mouse_buttons.just_pressed(MouseButton::Left) && !over_ui {
        if let Some(cursor) = windows.single().ok().and_then(|w| w.cursor_position()) {
            events.push(InputEvent::LeftClick {
                x: cursor.x.floor() as i64,
                y: cursor.y.floor() as i64,
            });
        }
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    for code in keyboard.get_just_pressed() {
        let key = key_from_code(*code);
        if key != Key::Other {
            events.push(InputEvent::KeyPressed { key, ctrl });
        }
    }

    // Runs even without events so the palette selection is picked up every frame
    let EditorSession { state, controller } = &mut *session;
    let outcome = controller.process_events(state, &events);
    if outcome.quit {
        info!("Window closed, exiting");
        std::process::exit(0);
    }
    if outcome.zoom_changed {
        debug!("Tile size now {}", state.viewport.tile_size());
    }
}

/// Move the camera for held WASD keys, once per fixed tick
fn pan_camera(keyboard: Res<ButtonInput<KeyCode>>, mut session: ResMut<EditorSession>) {
    let held = pan_keys(&keyboard);
    if !held.any() {
        return;
    }
    let EditorSession { state, controller } = &mut *session;
    controller.apply_held_keys(state, held);
}

/// Exit as soon as the palette side has asked for it
fn exit_on_shutdown(shutdown: Res<Shutdown>) {
    if shutdown.0.is_requested() {
        info!("Palette closed, exiting");
        std::process::exit(0);
    }
}
