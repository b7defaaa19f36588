//! Camera offset and zoom for the tile grid

/// Smallest tile size the zoom can reach, in pixels
pub const MIN_TILE_SIZE: u32 = 4;
/// Tile size change per wheel notch
pub const ZOOM_STEP: u32 = 4;
/// Tile size at startup unless configured otherwise
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Movement keys held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PanKeys {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Camera position in screen pixels and the current tile size (zoom)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub camera_x: i64,
    pub camera_y: i64,
    tile_size: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}

impl Viewport {
    pub fn new(tile_size: u32) -> Self {
        Self {
            camera_x: 0,
            camera_y: 0,
            tile_size: tile_size.max(MIN_TILE_SIZE),
        }
    }

    pub fn with_camera(mut self, camera_x: i64, camera_y: i64) -> Self {
        self.camera_x = camera_x;
        self.camera_y = camera_y;
        self
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Grid cell under a screen pixel. Floors toward negative infinity.
    ///
    /// `None` if the pixel plus the camera offset leaves the `i64` range.
    pub fn screen_to_grid(&self, px: i64, py: i64) -> Option<(i64, i64)> {
        let size = i64::from(self.tile_size);
        Some((
            px.checked_add(self.camera_x)?.div_euclid(size),
            py.checked_add(self.camera_y)?.div_euclid(size),
        ))
    }

    /// Screen pixel of a grid cell's top-left corner.
    ///
    /// `None` for cells too far away to have an `i64` screen position.
    pub fn grid_to_screen(&self, gx: i64, gy: i64) -> Option<(i64, i64)> {
        let size = i64::from(self.tile_size);
        Some((
            gx.checked_mul(size)?.checked_sub(self.camera_x)?,
            gy.checked_mul(size)?.checked_sub(self.camera_y)?,
        ))
    }

    /// Step the tile size by `ZOOM_STEP` in the direction of `delta`.
    ///
    /// Zooming out stops at `MIN_TILE_SIZE`; zooming in is unbounded.
    /// Returns true if the tile size changed.
    pub fn zoom(&mut self, delta: i32) -> bool {
        let previous = self.tile_size;
        self.tile_size = match delta.signum() {
            1 => self.tile_size.saturating_add(ZOOM_STEP),
            -1 => self.tile_size.saturating_sub(ZOOM_STEP).max(MIN_TILE_SIZE),
            _ => self.tile_size,
        };
        self.tile_size != previous
    }

    /// Move the camera by `step` per held key.
    ///
    /// Up and left increase the camera offset, down and right decrease it, so
    /// the map content slides in the direction of the key.
    pub fn pan(&mut self, keys: PanKeys, step: i64) {
        if keys.up {
            self.camera_y = self.camera_y.saturating_add(step);
        }
        if keys.down {
            self.camera_y = self.camera_y.saturating_sub(step);
        }
        if keys.left {
            self.camera_x = self.camera_x.saturating_add(step);
        }
        if keys.right {
            self.camera_x = self.camera_x.saturating_sub(step);
        }
    }
}
