//! The tile grid seam and a couple of grid adapters
//!
//! Anything that stores tiles can drive the transition resolver by
//! implementing [`TileGrid`]. Lookups outside the grid return `None` rather
//! than failing.

use crate::direction::Direction;
use crate::tile::TileRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Largest width, height or layer count whose cells are all addressable by
/// an `i32` [`TileCoord`]
pub const MAX_EXTENT: u32 = i32::MAX as u32;

/// A cell position: column `x`, row `y`, layer `z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighboring cell in `dir`, on the same layer.
    ///
    /// Wraps at the `i32` limits; the wrapped coordinate is never inside a
    /// grid no wider than [`MAX_EXTENT`].
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
            z: self.z,
        }
    }

    /// All 8 neighbors in [`Direction::ALL`] order
    pub fn neighbors(self) -> [TileCoord; 8] {
        Direction::ALL.map(|dir| self.step(dir))
    }
}

/// Extent of a grid: `width x height` cells on each of `layers` layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    pub width: u32,
    pub height: u32,
    pub layers: u32,
}

impl GridBounds {
    pub const fn new(width: u32, height: u32, layers: u32) -> Self {
        Self {
            width,
            height,
            layers,
        }
    }

    /// Whether `coord` lies inside the grid
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.width
            && (coord.y as u32) < self.height
            && (coord.z as u32) < self.layers
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize * self.layers as usize
    }

    /// Every coordinate, layer by layer in row-major order.
    ///
    /// Cells past [`MAX_EXTENT`] on any axis have no coordinate and are not
    /// visited.
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> {
        let width = self.width.min(MAX_EXTENT);
        let height = self.height.min(MAX_EXTENT);
        let layers = self.layers.min(MAX_EXTENT);
        (0..layers).flat_map(move |z| {
            (0..height).flat_map(move |y| {
                (0..width).map(move |x| TileCoord::new(x as i32, y as i32, z as i32))
            })
        })
    }
}

/// Coordinate-addressed tile storage
///
/// `set_tile` must make the new value visible to the next `get_tile` call.
pub trait TileGrid {
    /// Extent of the grid
    fn bounds(&self) -> GridBounds;

    /// The tile at `coord`, or `None` for empty or out-of-bounds cells
    fn get_tile(&self, coord: TileCoord) -> Option<TileRecord>;

    /// Store `tile` at `coord`. Out-of-bounds writes are ignored.
    fn set_tile(&mut self, coord: TileCoord, tile: TileRecord);
}

impl<G: TileGrid + ?Sized> TileGrid for &mut G {
    fn bounds(&self) -> GridBounds {
        (**self).bounds()
    }

    fn get_tile(&self, coord: TileCoord) -> Option<TileRecord> {
        (**self).get_tile(coord)
    }

    fn set_tile(&mut self, coord: TileCoord, tile: TileRecord) {
        (**self).set_tile(coord, tile)
    }
}

/// Pass-through grid that remembers every write, in order
pub struct RecordingGrid<G> {
    inner: G,
    writes: Vec<(TileCoord, TileRecord)>,
}

impl<G: TileGrid> RecordingGrid<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            writes: Vec::new(),
        }
    }

    /// Writes seen so far, oldest first
    pub fn writes(&self) -> &[(TileCoord, TileRecord)] {
        &self.writes
    }

    /// Distinct coordinates written, sorted
    pub fn written_coords(&self) -> Vec<TileCoord> {
        let mut coords: Vec<TileCoord> = self.writes.iter().map(|(c, _)| *c).collect();
        coords.sort();
        coords.dedup();
        coords
    }

    /// Forget recorded writes without touching the grid
    pub fn clear(&mut self) {
        self.writes.clear();
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: TileGrid> TileGrid for RecordingGrid<G> {
    fn bounds(&self) -> GridBounds {
        self.inner.bounds()
    }

    fn get_tile(&self, coord: TileCoord) -> Option<TileRecord> {
        self.inner.get_tile(coord)
    }

    fn set_tile(&mut self, coord: TileCoord, tile: TileRecord) {
        self.writes.push((coord, tile));
        self.inner.set_tile(coord, tile);
    }
}

/// Copy-on-write view over a read-only grid
///
/// Writes land in a side table and shadow the base grid, which is never
/// modified. Used to compute previews of an edit.
pub struct PreviewGrid<'a, G: ?Sized> {
    base: &'a G,
    pending: HashMap<TileCoord, TileRecord>,
}

impl<'a, G: TileGrid + ?Sized> PreviewGrid<'a, G> {
    pub fn new(base: &'a G) -> Self {
        Self {
            base,
            pending: HashMap::new(),
        }
    }

    /// Cells whose previewed value differs from the base grid, sorted by
    /// layer, then row, then column
    pub fn changes(&self) -> Vec<(TileCoord, TileRecord)> {
        let mut changes: Vec<(TileCoord, TileRecord)> = self
            .pending
            .iter()
            .filter(|(coord, tile)| self.base.get_tile(**coord) != Some(**tile))
            .map(|(coord, tile)| (*coord, *tile))
            .collect();
        changes.sort_by_key(|(c, _)| (c.z, c.y, c.x));
        changes
    }
}

impl<G: TileGrid + ?Sized> TileGrid for PreviewGrid<'_, G> {
    fn bounds(&self) -> GridBounds {
        self.base.bounds()
    }

    fn get_tile(&self, coord: TileCoord) -> Option<TileRecord> {
        match self.pending.get(&coord) {
            Some(tile) => Some(*tile),
            None => self.base.get_tile(coord),
        }
    }

    fn set_tile(&mut self, coord: TileCoord, tile: TileRecord) {
        if self.bounds().contains(coord) {
            self.pending.insert(coord, tile);
        }
    }
}
