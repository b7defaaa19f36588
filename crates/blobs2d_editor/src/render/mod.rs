//! Frame display for the editor viewport
//!
//! The engine composes each frame into an RGBA buffer the size of the window.
//! This module owns a texture of the same size, shown by a single sprite that
//! covers the window, and copies the buffer into it after input is applied.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::PrimaryWindow;
use blobs2d_core::{FrameStats, Renderer, CLEAR_COLOR};
use image::RgbaImage;

use crate::{EditorSession, WINDOW_SIZE};

/// Plugin for frame composition and display
pub struct FrameRenderPlugin;

impl Plugin for FrameRenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_frame_display)
            .add_systems(PostUpdate, compose_frame);
    }
}

/// CPU-side frame and the texture it is uploaded to
#[derive(Resource)]
pub struct FrameCanvas {
    pub handle: Handle<Image>,
    pub canvas: RgbaImage,
    pub renderer: Renderer,
    /// Counters of the previous frame; placeholder use is logged when they change
    pub last_stats: FrameStats,
}

/// Marker component for the sprite showing the composed frame
#[derive(Component)]
pub struct FrameSprite;

/// Canvas size for a window, in logical pixels (never zero)
pub fn canvas_size(window: &Window) -> (u32, u32) {
    (
        (window.resolution.width() as u32).max(1),
        (window.resolution.height() as u32).max(1),
    )
}

fn frame_extent(width: u32, height: u32) -> Extent3d {
    Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

/// Texture cleared to the background color. Kept in the main world so it can be rewritten.
fn blank_frame_image(width: u32, height: u32) -> Image {
    Image::new_fill(
        frame_extent(width, height),
        TextureDimension::D2,
        &CLEAR_COLOR.0,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

/// Store this frame's counters. Returns true when they changed and include placeholders.
fn record_stats(last: &mut FrameStats, stats: FrameStats) -> bool {
    if *last == stats {
        return false;
    }
    *last = stats;
    stats.substituted > 0
}

/// Spawns the camera, the frame texture and the sprite that shows it
fn setup_frame_display(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let (width, height) = windows.single().map(canvas_size).unwrap_or(WINDOW_SIZE);
    let handle = images.add(blank_frame_image(width, height));

    commands.spawn(Camera2d);
    commands.spawn((
        Sprite {
            image: handle.clone(),
            custom_size: Some(Vec2::new(width as f32, height as f32)),
            ..default()
        },
        FrameSprite,
    ));
    commands.insert_resource(FrameCanvas {
        handle,
        canvas: RgbaImage::new(width, height),
        renderer: Renderer::new(),
        last_stats: FrameStats::default(),
    });
}

/// Draw the session into the canvas and upload it
fn compose_frame(
    mut session: ResMut<EditorSession>,
    frame: Option<ResMut<FrameCanvas>>,
    mut images: ResMut<Assets<Image>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut sprites: Query<&mut Sprite, With<FrameSprite>>,
) {
    let Some(mut frame) = frame else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };

    let (width, height) = canvas_size(window);
    if frame.canvas.dimensions() != (width, height) {
        frame.canvas = RgbaImage::new(width, height);
        for mut sprite in sprites.iter_mut() {
            sprite.custom_size = Some(Vec2::new(width as f32, height as f32));
        }
    }

    let FrameCanvas {
        handle,
        canvas,
        renderer,
        last_stats,
    } = &mut *frame;
    let stats = session.state.render(renderer, canvas);
    if record_stats(last_stats, stats) {
        debug!(
            "Frame: {} drawn, {} culled, {} placeholders",
            stats.drawn, stats.culled, stats.substituted
        );
    }

    let Some(image) = images.get_mut(&*handle) else {
        return;
    };
    if image.width() != width || image.height() != height {
        image.resize(frame_extent(width, height));
    }
    match image.data.as_mut() {
        Some(data) if data.len() == canvas.as_raw().len() => {
            data.copy_from_slice(canvas.as_raw());
        }
        _ => image.data = Some(canvas.as_raw().clone()),
    }
}
