//! Frame composition: cull placed tiles against the screen and blit their images

use crate::catalog::{placeholder_image, TileCatalog, TileId};
use crate::map::MapStore;
use crate::viewport::Viewport;
use image::imageops;
use image::{Rgba, RgbaImage};
use std::collections::HashSet;

/// Background the frame is cleared to
pub const CLEAR_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Whether a tile drawn at screen position (sx, sy) can touch the visible area.
///
/// Allows one tile of slack on the near edges and none on the far edges.
pub fn is_on_screen(sx: i64, sy: i64, tile_size: u32, width: u32, height: u32) -> bool {
    let size = i64::from(tile_size);
    (-size..=i64::from(width)).contains(&sx) && (-size..=i64::from(height)).contains(&sy)
}

/// A tile to draw at a screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub x: i64,
    pub y: i64,
    pub tile_id: TileId,
}

/// Counters for one composed frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    /// Tiles drawn with the placeholder because their image was unavailable
    pub substituted: usize,
}

/// Draws the map into an RGBA canvas
#[derive(Debug, Default)]
pub struct Renderer {
    /// Unknown ids already reported, so each is logged once
    warned: HashSet<TileId>,
    placeholder: Option<RgbaImage>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placed tiles that pass the culling rule, in map order.
    ///
    /// Tiles too far away to have a screen position are culled.
    pub fn visible_tiles<'a>(
        map: &'a MapStore,
        viewport: &'a Viewport,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = DrawCommand> + 'a {
        let tile_size = viewport.tile_size();
        map.tiles().iter().filter_map(move |tile| {
            let (x, y) = viewport.grid_to_screen(tile.x, tile.y)?;
            is_on_screen(x, y, tile_size, width, height).then_some(DrawCommand {
                x,
                y,
                tile_id: tile.tile_id,
            })
        })
    }

    /// Clear `canvas` and draw every visible tile.
    ///
    /// Later map entries are drawn over earlier ones at the same cell. Ids the
    /// catalog does not know are drawn with the placeholder and logged once.
    /// The catalog is expected to be scaled to the viewport's tile size.
    pub fn draw_frame(
        &mut self,
        canvas: &mut RgbaImage,
        map: &MapStore,
        catalog: &TileCatalog,
        viewport: &Viewport,
    ) -> FrameStats {
        for pixel in canvas.pixels_mut() {
            *pixel = CLEAR_COLOR;
        }

        let (width, height) = canvas.dimensions();
        let tile_size = viewport.tile_size();
        let mut stats = FrameStats::default();

        for command in Self::visible_tiles(map, viewport, width, height) {
            let image = match catalog.image_for(command.tile_id) {
                Ok(Some(image)) if image.width() == tile_size => image,
                Ok(_) => {
                    stats.substituted += 1;
                    self.placeholder(tile_size)
                }
                Err(e) => {
                    if self.warned.insert(command.tile_id) {
                        log::warn!("{}; drawing placeholder", e);
                    }
                    stats.substituted += 1;
                    self.placeholder(tile_size)
                }
            };
            imageops::overlay(canvas, image, command.x, command.y);
            stats.drawn += 1;
        }

        stats.culled = map.len() - stats.drawn;
        stats
    }

    fn placeholder(&mut self, tile_size: u32) -> &RgbaImage {
        if self
            .placeholder
            .as_ref()
            .is_some_and(|image| image.width() != tile_size)
        {
            self.placeholder = None;
        }
        self.placeholder
            .get_or_insert_with(|| placeholder_image(tile_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{TileType, PLACEHOLDER_COLOR};
    use crate::map::PlacedTile;

    fn solid_tile_catalog(dir: &std::path::Path, tiles: &[(TileId, Rgba<u8>)]) -> TileCatalog {
        let mut catalog = TileCatalog::new();
        for (id, color) in tiles {
            let path = dir.join(format!("tile_{}.png", id));
            RgbaImage::from_pixel(1, 1, *color).save(&path).unwrap();
            catalog.insert(TileType::new(*id, format!("tile {}", id), path));
        }
        catalog
    }

    #[test]
    fn test_culling_rule_edges() {
        // Near edges allow one tile of slack
        assert!(is_on_screen(-32, -32, 32, 800, 600));
        assert!(!is_on_screen(-33, 0, 32, 800, 600));
        assert!(!is_on_screen(0, -33, 32, 800, 600));
        // Far edges are inclusive with no slack
        assert!(is_on_screen(800, 600, 32, 800, 600));
        assert!(!is_on_screen(801, 0, 32, 800, 600));
        assert!(!is_on_screen(0, 601, 32, 800, 600));
    }

    #[test]
    fn test_visible_tiles_follow_camera() {
        let map = MapStore::from_tiles([
            PlacedTile::new(0, 0, 1),
            PlacedTile::new(30, 0, 1),
            PlacedTile::new(-2, 0, 1),
        ]);
        let viewport = Viewport::new(32).with_camera(-10, 0);

        let visible: Vec<_> = Renderer::visible_tiles(&map, &viewport, 800, 600).collect();
        assert_eq!(
            visible,
            vec![DrawCommand {
                x: 10,
                y: 0,
                tile_id: 1
            }]
        );
    }

    #[test]
    fn test_draw_frame_blits_scaled_tiles() {
        let dir = tempfile::tempdir().unwrap();
        let green = Rgba([0, 255, 0, 255]);
        let blue = Rgba([0, 0, 255, 255]);
        let mut catalog = solid_tile_catalog(dir.path(), &[(1, green), (2, blue)]);
        let viewport = Viewport::new(4);
        catalog.rescale_all(viewport.tile_size());

        let map = MapStore::from_tiles([
            PlacedTile::new(0, 0, 1),
            PlacedTile::new(1, 1, 1),
            PlacedTile::new(1, 1, 2),
        ]);
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));

        let stats = Renderer::new().draw_frame(&mut canvas, &map, &catalog, &viewport);

        assert_eq!(stats.drawn, 3);
        assert_eq!(stats.substituted, 0);
        assert_eq!(*canvas.get_pixel(0, 0), green);
        assert_eq!(*canvas.get_pixel(3, 3), green);
        // Later duplicate at (1, 1) is drawn on top
        assert_eq!(*canvas.get_pixel(4, 4), blue);
        assert_eq!(*canvas.get_pixel(7, 7), blue);
        assert_eq!(*canvas.get_pixel(9, 9), CLEAR_COLOR);
    }

    #[test]
    fn test_unknown_tile_id_draws_placeholder() {
        let mut catalog = TileCatalog::new();
        let viewport = Viewport::new(4);
        catalog.rescale_all(viewport.tile_size());

        let map = MapStore::from_tiles([PlacedTile::new(0, 0, 42), PlacedTile::new(1, 0, 42)]);
        let mut canvas = RgbaImage::new(8, 4);
        let mut renderer = Renderer::new();

        let stats = renderer.draw_frame(&mut canvas, &map, &catalog, &viewport);
        assert_eq!(stats.substituted, 2);
        assert!(canvas.pixels().all(|p| *p == PLACEHOLDER_COLOR));
        assert!(renderer.warned.contains(&42));
    }

    #[test]
    fn test_far_away_tile_is_culled() {
        let catalog = TileCatalog::new();
        let viewport = Viewport::new(32);
        let map = MapStore::from_tiles([
            PlacedTile::new(400_000_000_000_000_000, 0, 1),
            PlacedTile::new(0, i64::MIN, 1),
        ]);
        let mut canvas = RgbaImage::new(64, 64);

        let stats = Renderer::new().draw_frame(&mut canvas, &map, &catalog, &viewport);
        assert_eq!(stats.drawn, 0);
        assert_eq!(stats.culled, 2);
        assert!(canvas.pixels().all(|p| *p == CLEAR_COLOR));
    }

    #[test]
    fn test_offscreen_tiles_are_culled() {
        let catalog = TileCatalog::new();
        let viewport = Viewport::new(4);
        let map = MapStore::from_tiles([PlacedTile::new(100, 100, 1)]);
        let mut canvas = RgbaImage::new(8, 8);

        let stats = Renderer::new().draw_frame(&mut canvas, &map, &catalog, &viewport);
        assert_eq!(
            stats,
            FrameStats {
                drawn: 0,
                culled: 1,
                substituted: 0
            }
        );
        assert!(canvas.pixels().all(|p| *p == CLEAR_COLOR));
    }
}
