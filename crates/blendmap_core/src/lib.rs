//! Core data structures for blendmap
//!
//! This crate provides the plain-data types the terrain transition resolver
//! works on:
//! - `TileRecord` - packed base terrain / overlay terrain / shape value
//! - `Direction` - the 8 clockwise neighbor directions and their mask bits
//! - `TileGrid` - the coordinate-addressed storage seam, plus `TileMap`,
//!   an in-memory layered implementation
//! - `TerrainCatalog` - terrain priorities and overlay graphic sets

mod catalog;
mod direction;
mod grid;
mod map;
mod tile;

pub use catalog::{CatalogError, TerrainCatalog, TerrainDef, TerrainPriority};
pub use direction::{bits, Direction};
pub use grid::{GridBounds, PreviewGrid, RecordingGrid, TileCoord, TileGrid, MAX_EXTENT};
pub use map::{MapError, TileLayer, TileMap};
pub use tile::{
    is_terrain_id, TerrainId, TileRecord, MAX_TERRAIN_ID, MIN_TERRAIN_ID, SHAPE_COUNT,
};
