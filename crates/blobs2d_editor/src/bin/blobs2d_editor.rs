//! blobs2d editor binary
//!
//! Run with: blobs2d_editor [map_path]
//!
//! Paints with the tile picked in the Block Selector window. Ctrl+S saves the map.

use bevy::prelude::*;
use blobs2d_editor::{default_plugins, EditorPlugin};

fn main() {
    let mut editor = EditorPlugin::editor();
    if let Some(map_path) = std::env::args_os().nth(1) {
        editor = editor.with_map_path(map_path);
    }

    App::new()
        .add_plugins(default_plugins("blobs2d editor"))
        .add_plugins(editor)
        .run();
}
