//! Tile type catalog with per-tile-size image cache

use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Identifier of a tile type, as written in catalog and map files
pub type TileId = u32;

/// Fill color used when a tile image cannot be loaded or its id is unknown
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([255, 0, 0, 255]);

const COMMENT_MARKER: char = '#';

#[derive(Debug)]
pub enum CatalogError {
    IoError(String),
    ParseError { line: usize, message: String },
    UnknownTileId(TileId),
    ImageLoadError {
        id: TileId,
        path: PathBuf,
        message: String,
    },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::IoError(e) => write!(f, "IO error: {}", e),
            CatalogError::ParseError { line, message } => {
                write!(f, "Parse error on catalog line {}: {}", line, message)
            }
            CatalogError::UnknownTileId(id) => write!(f, "Unknown tile id: {}", id),
            CatalogError::ImageLoadError { id, path, message } => write!(
                f,
                "Error loading image for tile {}: {}. {}",
                id,
                path.display(),
                message
            ),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Decoded source image, loaded at most once per run
#[derive(Debug, Clone, Default)]
enum SourceImage {
    #[default]
    Unloaded,
    Loaded(DynamicImage),
    Failed,
}

/// A named tile type with its source image and the render-ready copy
#[derive(Debug, Clone)]
pub struct TileType {
    pub id: TileId,
    pub name: String,
    pub image_path: PathBuf,
    source: SourceImage,
    cached_image: Option<RgbaImage>,
}

impl TileType {
    pub fn new(id: TileId, name: impl Into<String>, image_path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            image_path: image_path.into(),
            source: SourceImage::Unloaded,
            cached_image: None,
        }
    }

    /// Image scaled to the catalog's current tile size, if it has been built
    pub fn cached_image(&self) -> Option<&RgbaImage> {
        self.cached_image.as_ref()
    }

    /// Rebuild `cached_image` at the given size, decoding the source on first use
    fn rescale(&mut self, tile_size: u32) {
        if let SourceImage::Unloaded = self.source {
            log::info!("Loading image for tile {}: {}", self.id, self.image_path.display());
            self.source = match self.load_source() {
                Ok(image) => SourceImage::Loaded(image),
                Err(e) => {
                    log::warn!("{}; using placeholder", e);
                    SourceImage::Failed
                }
            };
        }

        self.cached_image = Some(match &self.source {
            SourceImage::Loaded(image) => image
                .resize_exact(tile_size, tile_size, FilterType::Nearest)
                .to_rgba8(),
            SourceImage::Unloaded | SourceImage::Failed => placeholder_image(tile_size),
        });
    }

    fn load_source(&self) -> Result<DynamicImage, CatalogError> {
        image::open(&self.image_path).map_err(|e| CatalogError::ImageLoadError {
            id: self.id,
            path: self.image_path.clone(),
            message: e.to_string(),
        })
    }
}

/// Solid placeholder tile of the given size
pub fn placeholder_image(tile_size: u32) -> RgbaImage {
    RgbaImage::from_pixel(tile_size, tile_size, PLACEHOLDER_COLOR)
}

/// All tile types known to the session, keyed by id
#[derive(Debug, Clone, Default)]
pub struct TileCatalog {
    entries: BTreeMap<TileId, TileType>,
    /// Tile size the cached images were last built for
    scaled_to: Option<u32>,
}

impl TileCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse `name, image_path, id` records, one per line.
    ///
    /// Blank lines and `#` comments are skipped. When an id appears twice the
    /// later definition replaces the earlier one.
    pub fn parse(source: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }

            let parse_error = |message: String| CatalogError::ParseError {
                line: index + 1,
                message,
            };

            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 3 {
                return Err(parse_error(format!(
                    "expected `name, image_path, id`, found {} field(s)",
                    fields.len()
                )));
            }

            let id: TileId = fields[2]
                .parse()
                .map_err(|_| parse_error(format!("invalid tile id `{}`", fields[2])))?;
            if id == 0 {
                return Err(parse_error("tile id must be positive".to_string()));
            }

            catalog.insert(TileType::new(id, fields[0], fields[1]));
        }

        Ok(catalog)
    }

    /// Add or replace a tile type. Invalidates the image cache for that entry.
    pub fn insert(&mut self, tile: TileType) -> Option<TileType> {
        self.entries.insert(tile.id, tile)
    }

    pub fn get(&self, id: TileId) -> Option<&TileType> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tile types in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &TileType> {
        self.entries.values()
    }

    pub fn first_id(&self) -> Option<TileId> {
        self.entries.keys().next().copied()
    }

    /// Tile size of the current image cache, `None` before the first rescale
    pub fn scaled_to(&self) -> Option<u32> {
        self.scaled_to
    }

    /// Rebuild every cached image at `tile_size` x `tile_size`.
    ///
    /// Images that fail to load are replaced by a placeholder of the same size.
    pub fn rescale_all(&mut self, tile_size: u32) {
        for tile in self.entries.values_mut() {
            tile.rescale(tile_size);
        }
        self.scaled_to = Some(tile_size);
    }

    /// Rescale only if the cache was built for a different size
    pub fn ensure_scaled(&mut self, tile_size: u32) -> bool {
        let fresh = self.entries.values().all(|t| t.cached_image.is_some());
        if fresh && self.scaled_to == Some(tile_size) {
            return false;
        }
        self.rescale_all(tile_size);
        true
    }

    /// Render-ready image for a tile id
    pub fn image_for(&self, id: TileId) -> Result<Option<&RgbaImage>, CatalogError> {
        self.entries
            .get(&id)
            .map(TileType::cached_image)
            .ok_or(CatalogError::UnknownTileId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
# name, image, id
grass, tiles/grass.png, 1

stone , tiles/stone.png ,2
";

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let catalog = TileCatalog::parse(CATALOG).unwrap();

        assert_eq!(catalog.len(), 2);
        let stone = catalog.get(2).unwrap();
        assert_eq!(stone.name, "stone");
        assert_eq!(stone.image_path, PathBuf::from("tiles/stone.png"));
        assert!(stone.cached_image().is_none());
        assert_eq!(catalog.first_id(), Some(1));
    }

    #[test]
    fn test_parse_duplicate_id_last_wins() {
        let catalog = TileCatalog::parse("grass, a.png, 1\nmoss, b.png, 1\n").unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().name, "moss");
    }

    #[test]
    fn test_parse_rejects_short_line() {
        let err = TileCatalog::parse("grass, 1\n").unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_rejects_non_integer_id() {
        let err = TileCatalog::parse("# header\ngrass, a.png, one\n").unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { line: 2, .. }));

        let err = TileCatalog::parse("grass, a.png, 0\n").unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_missing_image_uses_placeholder() {
        let mut catalog = TileCatalog::parse("void, does/not/exist.png, 7\n").unwrap();
        catalog.rescale_all(8);

        let image = catalog.image_for(7).unwrap().unwrap();
        assert_eq!(image.dimensions(), (8, 8));
        assert!(image.pixels().all(|p| *p == PLACEHOLDER_COLOR));

        // Placeholder follows the tile size on later rescales
        catalog.rescale_all(12);
        assert_eq!(catalog.image_for(7).unwrap().unwrap().dimensions(), (12, 12));
    }

    #[test]
    fn test_rescale_scales_source_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grass.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 200, 0, 255]))
            .save(&path)
            .unwrap();

        let mut catalog = TileCatalog::new();
        catalog.insert(TileType::new(1, "grass", &path));
        catalog.rescale_all(32);

        let image = catalog.image_for(1).unwrap().unwrap();
        assert_eq!(image.dimensions(), (32, 32));
        assert_eq!(*image.get_pixel(31, 31), Rgba([0, 200, 0, 255]));
        assert_eq!(catalog.scaled_to(), Some(32));
    }

    #[test]
    fn test_ensure_scaled_only_on_size_change() {
        let mut catalog = TileCatalog::parse("void, missing.png, 1\n").unwrap();

        assert!(catalog.ensure_scaled(32));
        assert!(!catalog.ensure_scaled(32));
        assert!(catalog.ensure_scaled(36));
    }

    #[test]
    fn test_image_for_unknown_id() {
        let catalog = TileCatalog::parse(CATALOG).unwrap();
        assert!(matches!(
            catalog.image_for(99),
            Err(CatalogError::UnknownTileId(99))
        ));
    }
}
