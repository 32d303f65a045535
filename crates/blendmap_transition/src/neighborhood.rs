//! Neighbor sampling, candidate filtering and occurrence counting
//!
//! These are the first three phases of resolving a tile. Everything here is
//! stack-allocated and free of side effects.

use blendmap_core::{
    is_terrain_id, Direction, TerrainId, TerrainPriority, TileCoord, TileGrid, TileRecord,
    MAX_TERRAIN_ID,
};

/// Minimum number of neighbor slots a terrain must fill to blend.
/// A single odd neighbor never produces an overlay.
pub const MIN_OCCURRENCES: u8 = 2;

/// At most 8 / [`MIN_OCCURRENCES`] ids can reach the threshold
pub const MAX_CANDIDATES: usize = 4;

/// The 8 tiles around a coordinate, in [`Direction::ALL`] order
pub type Neighbors = [Option<TileRecord>; 8];

/// Per-direction terrain ids that survived filtering
pub type FilteredNeighbors = [Option<TerrainId>; 8];

/// Read the 8 neighbors of `coord`. Missing cells are `None`.
pub fn sample_neighbors<G: TileGrid + ?Sized>(grid: &G, coord: TileCoord) -> Neighbors {
    coord.neighbors().map(|n| grid.get_tile(n))
}

/// Keep only neighbors that could blend onto a tile of `center_base`.
///
/// A neighbor is dropped when its base id is outside `1..=31`, equals the
/// center's, has no priority, or its priority is not strictly above
/// `center_priority`. Existing overlays on neighbors are ignored; only their
/// base id counts.
pub fn filter_candidates<C: TerrainPriority + ?Sized>(
    neighbors: &Neighbors,
    center_base: TerrainId,
    center_priority: i32,
    catalog: &C,
) -> FilteredNeighbors {
    neighbors.map(|tile| {
        let id = tile?.base_id();
        if !is_terrain_id(id) || id == center_base {
            return None;
        }
        let priority = catalog.priority_of(id)?;
        (priority > center_priority).then_some(id)
    })
}

/// Candidate terrain ids, ascending, without heap allocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Candidates {
    ids: [TerrainId; MAX_CANDIDATES],
    len: usize,
}

impl Candidates {
    fn push(&mut self, id: TerrainId) {
        if self.len < MAX_CANDIDATES {
            self.ids[self.len] = id;
            self.len += 1;
        }
    }

    pub fn as_slice(&self) -> &[TerrainId] {
        &self.ids[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [TerrainId] {
        &mut self.ids[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Ids that fill at least [`MIN_OCCURRENCES`] of the filtered slots
pub fn collect_candidates(filtered: &FilteredNeighbors) -> Candidates {
    let mut counts = [0u8; MAX_TERRAIN_ID as usize + 1];
    for id in filtered.iter().flatten() {
        if let Some(count) = counts.get_mut(*id as usize) {
            *count += 1;
        }
    }

    let mut candidates = Candidates::default();
    for (id, &count) in counts.iter().enumerate() {
        if count >= MIN_OCCURRENCES {
            candidates.push(id as TerrainId);
        }
    }
    candidates
}

/// Mask with bit `d` set where direction `d` holds `id`
pub fn occupancy_mask(filtered: &FilteredNeighbors, id: TerrainId) -> u8 {
    Direction::ALL
        .iter()
        .zip(filtered)
        .filter(|(_, slot)| **slot == Some(id))
        .fold(0u8, |mask, (dir, _)| mask | dir.bit())
}
