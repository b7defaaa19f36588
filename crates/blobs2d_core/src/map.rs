//! Sparse map of placed tiles and its line-oriented file format
//!
//! Each record is `x<int> y<int> z<int> e`: grid x, grid y, tile id and a fixed
//! terminator. Cells are not required to be unique; the first tile listed for a
//! cell is the one lookups and painting act on, while rendering draws every entry.

use crate::catalog::{TileCatalog, TileId};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::path::Path;

const TERMINATOR: &str = "e";
const COMMENT_MARKER: char = '#';

#[derive(Debug)]
pub enum MapError {
    IoError(String),
    ParseError { line: usize, message: String },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::IoError(e) => write!(f, "IO error: {}", e),
            MapError::ParseError { line, message } => {
                write!(f, "Parse error on map line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for MapError {}

/// One tile instance at a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    pub x: i64,
    pub y: i64,
    pub tile_id: TileId,
}

impl PlacedTile {
    pub fn new(x: i64, y: i64, tile_id: TileId) -> Self {
        Self { x, y, tile_id }
    }
}

/// All placed tiles in file order, plus a first-match index by cell
#[derive(Debug, Clone, Default)]
pub struct MapStore {
    tiles: Vec<PlacedTile>,
    /// (x, y) -> index of the first tile at that cell
    by_cell: HashMap<(i64, i64), usize>,
}

impl MapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = PlacedTile>) -> Self {
        let mut map = Self::new();
        for tile in tiles {
            map.push(tile);
        }
        map
    }

    /// Load map from file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| MapError::IoError(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse `x<int> y<int> z<int> e` records, skipping blank lines and `#` comments
    pub fn parse(source: &str) -> Result<Self, MapError> {
        let mut map = Self::new();

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(COMMENT_MARKER) {
                continue;
            }
            let tile = parse_record(line).map_err(|message| MapError::ParseError {
                line: index + 1,
                message,
            })?;
            map.push(tile);
        }

        Ok(map)
    }

    /// Serialize every tile in list order, one record per line
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.tiles.len() * 16);
        for tile in &self.tiles {
            let _ = writeln!(out, "x{} y{} z{} {}", tile.x, tile.y, tile.tile_id, TERMINATOR);
        }
        out
    }

    /// Save map to file.
    ///
    /// The content is written to a sibling temporary file which then replaces
    /// the destination. If the replace fails the temporary file is removed.
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| MapError::IoError(format!("Invalid map path: {}", path.display())))?;
        let mut temp_name = file_name.to_os_string();
        temp_name.push(".tmp");
        let temp_path = path.with_file_name(temp_name);

        std::fs::write(&temp_path, self.serialize())
            .map_err(|e| MapError::IoError(e.to_string()))?;
        if let Err(e) = std::fs::rename(&temp_path, path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(MapError::IoError(e.to_string()));
        }

        Ok(())
    }

    /// Append a tile. Cells already occupied keep pointing at their first tile.
    pub fn push(&mut self, tile: PlacedTile) {
        self.by_cell
            .entry((tile.x, tile.y))
            .or_insert(self.tiles.len());
        self.tiles.push(tile);
    }

    /// First tile placed at the cell, if any
    pub fn find_at(&self, x: i64, y: i64) -> Option<&PlacedTile> {
        self.by_cell.get(&(x, y)).map(|&index| &self.tiles[index])
    }

    /// Repaint the first tile at the cell. Empty cells are left empty.
    ///
    /// Returns the previous tile id when a tile was repainted.
    pub fn paint(&mut self, x: i64, y: i64, tile_id: TileId) -> Option<TileId> {
        let index = *self.by_cell.get(&(x, y))?;
        let tile = &mut self.tiles[index];
        Some(std::mem::replace(&mut tile.tile_id, tile_id))
    }

    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tile ids referenced by the map but absent from the catalog
    pub fn missing_tile_ids(&self, catalog: &TileCatalog) -> BTreeSet<TileId> {
        self.tiles
            .iter()
            .map(|tile| tile.tile_id)
            .filter(|id| !catalog.contains(*id))
            .collect()
    }
}

fn parse_record(line: &str) -> Result<PlacedTile, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(format!("expected 4 tokens, found {}", tokens.len()));
    }
    if tokens[3] != TERMINATOR {
        return Err(format!(
            "expected terminator `{}`, found `{}`",
            TERMINATOR, tokens[3]
        ));
    }

    let x = parse_prefixed(tokens[0], 'x')?;
    let y = parse_prefixed(tokens[1], 'y')?;
    let tile_id = parse_prefixed(tokens[2], 'z')?;

    Ok(PlacedTile { x, y, tile_id })
}

fn parse_prefixed<T: std::str::FromStr>(token: &str, prefix: char) -> Result<T, String> {
    let body = token
        .strip_prefix(prefix)
        .ok_or_else(|| format!("expected `{}` prefix in `{}`", prefix, token))?;
    body.parse()
        .map_err(|_| format!("invalid integer `{}` in `{}`", body, token))
}
