//! In-memory layered tile map

use crate::grid::{GridBounds, TileCoord, TileGrid, MAX_EXTENT};
use crate::tile::{TerrainId, TileRecord};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when loading or saving a map
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to read or write map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse map JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Map is {width}x{height}, dimensions are limited to {max}", max = MAX_EXTENT)]
    TooLarge { width: u32, height: u32 },
    #[error("Layer '{layer}' has {found} tiles, expected {expected}")]
    SizeMismatch {
        layer: String,
        expected: usize,
        found: usize,
    },
}

/// A single layer of tiles, row-major, `None` for empty cells
///
/// In JSON each tile is the raw packed [`TileRecord`] value (`null` for an
/// empty cell), not a bare terrain id. A raw `33` is base `1` with overlay
/// `1`; the reserved base id 33 is stored as `65537`
/// (`TileRecord::plain(33).raw()`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub id: Uuid,
    pub name: String,
    pub tiles: Vec<Option<TileRecord>>,
}

impl TileLayer {
    /// Create an empty layer sized for a `width x height` map
    pub fn new(name: String, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            tiles: vec![None; width as usize * height as usize],
        }
    }
}

/// A rectangular map with one or more tile layers. Layer index is the `z`
/// coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMap {
    pub width: u32,
    pub height: u32,
    pub layers: Vec<TileLayer>,
}

impl TileMap {
    /// Create a map with no layers
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Build a single-layer map of flat tiles from row-major base ids.
    ///
    /// Missing trailing ids leave cells empty; extra ids are ignored.
    pub fn from_base_ids(width: u32, height: u32, ids: &[TerrainId]) -> Self {
        let mut map = Self::new(width, height);
        let z = map.add_layer("Ground".to_string());
        let layer = &mut map.layers[z];
        for (slot, &id) in layer.tiles.iter_mut().zip(ids) {
            *slot = Some(TileRecord::plain(id));
        }
        map
    }

    /// Append an empty layer and return its index
    pub fn add_layer(&mut self, name: String) -> usize {
        self.layers
            .push(TileLayer::new(name, self.width, self.height));
        self.layers.len() - 1
    }

    /// Get a layer by index
    pub fn layer(&self, z: usize) -> Option<&TileLayer> {
        self.layers.get(z)
    }

    /// Find a layer index by its ID
    pub fn layer_index(&self, id: Uuid) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Empty a cell. Out-of-bounds coordinates are ignored.
    pub fn clear_tile(&mut self, coord: TileCoord) {
        if let Some(idx) = self.cell_index(coord) {
            self.layers[coord.z as usize].tiles[idx] = None;
        }
    }

    /// Base ids of one layer, row-major, `0` for empty cells
    pub fn base_ids(&self, z: usize) -> Vec<TerrainId> {
        self.layers
            .get(z)
            .map(|layer| {
                layer
                    .tiles
                    .iter()
                    .map(|t| t.map_or(0, |t| t.base_id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn cell_index(&self, coord: TileCoord) -> Option<usize> {
        if !self.bounds().contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.width as usize + coord.x as usize)
    }

    /// Check the dimensions are addressable and every layer holds exactly
    /// `width * height` cells
    pub fn validate(&self) -> Result<(), MapError> {
        let too_large = MapError::TooLarge {
            width: self.width,
            height: self.height,
        };
        if self.width > MAX_EXTENT || self.height > MAX_EXTENT {
            return Err(too_large);
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or(too_large)?;
        for layer in &self.layers {
            if layer.tiles.len() != expected {
                return Err(MapError::SizeMismatch {
                    layer: layer.name.clone(),
                    expected,
                    found: layer.tiles.len(),
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a map from JSON
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let map: TileMap = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a map from a JSON file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Save a map to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), MapError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

impl TileGrid for TileMap {
    fn bounds(&self) -> GridBounds {
        GridBounds::new(self.width, self.height, self.layers.len() as u32)
    }

    fn get_tile(&self, coord: TileCoord) -> Option<TileRecord> {
        let idx = self.cell_index(coord)?;
        self.layers[coord.z as usize].tiles.get(idx).copied().flatten()
    }

    fn set_tile(&mut self, coord: TileCoord, tile: TileRecord) {
        if let Some(idx) = self.cell_index(coord) {
            if let Some(slot) = self.layers[coord.z as usize].tiles.get_mut(idx) {
                *slot = Some(tile);
            }
        }
    }
}
