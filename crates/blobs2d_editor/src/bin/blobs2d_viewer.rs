//! blobs2d viewer binary
//!
//! Run with: blobs2d_viewer [map_path]
//!
//! Same world view as the editor without the palette. Clicks paint a fixed tile id.

use bevy::prelude::*;
use blobs2d_editor::{default_plugins, EditorPlugin};

fn main() {
    let mut viewer = EditorPlugin::viewer();
    if let Some(map_path) = std::env::args_os().nth(1) {
        viewer = viewer.with_map_path(map_path);
    }

    App::new()
        .add_plugins(default_plugins("blobs2d viewer"))
        .add_plugins(viewer)
        .run();
}
