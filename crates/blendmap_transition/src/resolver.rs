//! The transition resolver
//!
//! For one tile the resolver:
//! 1. samples the 8 neighbors,
//! 2. keeps neighbors of a strictly higher-priority terrain,
//! 3. keeps terrains filling at least two neighbor slots,
//! 4. tries those terrains from highest priority down, looking for one whose
//!    neighbor mask exactly matches a catalog shape,
//! 5. rewrites the tile with that overlay, or flat if nothing matched.
//!
//! # Propagation scope
//!
//! An edit can change the correct overlay of the edited tile and of its 8
//! neighbors, so [`TransitionResolver::resolve_with_neighbors`] re-resolves
//! exactly that 3x3 ring. Nothing further out is touched, even if a
//! neighbor-of-a-neighbor would now resolve differently. Overlays never feed
//! back into neighbor decisions (only base ids do), so with the current rules
//! the single ring is sufficient; callers can rely on the bounded cost of at
//! most 9 resolutions per edit.

use std::cmp::Reverse;

use blendmap_core::{
    is_terrain_id, Direction, TerrainCatalog, TerrainId, TerrainPriority, TileCoord, TileGrid,
    TileRecord,
};
use tracing::{debug, info, trace};

use crate::neighborhood::{
    collect_candidates, filter_candidates, occupancy_mask, sample_neighbors, FilteredNeighbors,
};
use crate::shapes::find_shape;

/// A chosen overlay: which terrain blends in, and with which shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub overlay: TerrainId,
    /// 1-based shape catalog index
    pub shape: u8,
}

/// What happened to a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No tile, or a base id outside `1..=31`. The stored value is untouched.
    Skipped,
    /// No transition applies; any overlay was stripped.
    Flattened,
    /// An overlay was selected.
    Blended(Transition),
}

/// Outcome counts for a batch of resolutions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub blended: usize,
    pub flattened: usize,
    pub skipped: usize,
    /// Tiles whose stored value actually changed
    pub changed: usize,
}

impl ResolveStats {
    fn record(&mut self, resolution: Resolution, changed: bool) {
        match resolution {
            Resolution::Skipped => self.skipped += 1,
            Resolution::Flattened => self.flattened += 1,
            Resolution::Blended(_) => self.blended += 1,
        }
        if changed {
            self.changed += 1;
        }
    }

    /// Number of coordinates visited
    pub fn total(&self) -> usize {
        self.blended + self.flattened + self.skipped
    }

    /// Fold another batch into this one
    pub fn merge(&mut self, other: ResolveStats) {
        self.blended += other.blended;
        self.flattened += other.flattened;
        self.skipped += other.skipped;
        self.changed += other.changed;
    }
}

/// Chooses and applies terrain transition overlays.
///
/// Holds only a reference to the terrain priorities; the shape catalog is
/// static. Working state lives on the stack of each call, so one resolver can
/// be shared freely. The grid itself needs a single writer for the duration
/// of a call.
pub struct TransitionResolver<'a, C: ?Sized = TerrainCatalog> {
    catalog: &'a C,
}

impl<'a, C: TerrainPriority + ?Sized> TransitionResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a C {
        self.catalog
    }

    /// Priority of a center tile. Terrains missing from the catalog rank
    /// lowest, so known terrains still blend over them.
    fn center_priority(&self, id: TerrainId) -> i32 {
        self.catalog.priority_of(id).unwrap_or(0)
    }

    /// Pick the overlay for an already filtered neighborhood.
    ///
    /// Candidates are tried from highest priority down; equal priorities are
    /// tried in ascending terrain id. Each candidate is matched on its own
    /// mask only. Returns `None` when no candidate's mask is a catalog shape.
    pub fn select_transition(&self, filtered: &FilteredNeighbors) -> Option<Transition> {
        let mut candidates = collect_candidates(filtered);
        // Stable sort keeps ascending ids within a priority
        candidates
            .as_mut_slice()
            .sort_by_key(|&id| Reverse(self.catalog.priority_of(id).unwrap_or(0)));

        candidates.as_slice().iter().find_map(|&id| {
            let mask = occupancy_mask(filtered, id);
            find_shape(mask).map(|idx| Transition {
                overlay: id,
                shape: (idx + 1) as u8,
            })
        })
    }

    /// Work out the record `coord` should hold, without writing it.
    fn plan<G: TileGrid + ?Sized>(
        &self,
        grid: &G,
        coord: TileCoord,
    ) -> Option<(TileRecord, Resolution, TileRecord)> {
        let current = grid.get_tile(coord)?;
        let base = current.base_id();
        if !is_terrain_id(base) {
            return None;
        }

        let neighbors = sample_neighbors(grid, coord);
        let filtered =
            filter_candidates(&neighbors, base, self.center_priority(base), self.catalog);

        let (resolution, tile) = match self.select_transition(&filtered) {
            Some(t) => (
                Resolution::Blended(t),
                TileRecord::encode(base, t.overlay, t.shape),
            ),
            None => (Resolution::Flattened, TileRecord::plain(base)),
        };
        Some((current, resolution, tile))
    }

    /// The record `coord` would hold after resolution, or `None` if the tile
    /// would be skipped
    pub fn evaluate<G: TileGrid + ?Sized>(
        &self,
        grid: &G,
        coord: TileCoord,
    ) -> Option<TileRecord> {
        self.plan(grid, coord).map(|(_, _, tile)| tile)
    }

    fn apply<G: TileGrid + ?Sized>(&self, grid: &mut G, coord: TileCoord) -> (Resolution, bool) {
        let Some((current, resolution, tile)) = self.plan(grid, coord) else {
            return (Resolution::Skipped, false);
        };
        if tile == current {
            return (resolution, false);
        }
        trace!("Resolved {:?}: {:?} -> {:?}", coord, current, tile);
        grid.set_tile(coord, tile);
        (resolution, true)
    }

    /// Resolve exactly one tile.
    ///
    /// The grid is only written when the stored value changes.
    pub fn resolve_one<G: TileGrid + ?Sized>(
        &self,
        grid: &mut G,
        coord: TileCoord,
    ) -> Resolution {
        self.apply(grid, coord).0
    }

    /// Resolve `coord` and then each of its 8 neighbors, in direction order.
    ///
    /// Call this after any edit at `coord`. Neighbors outside the grid are
    /// skipped.
    pub fn resolve_with_neighbors<G: TileGrid + ?Sized>(
        &self,
        grid: &mut G,
        coord: TileCoord,
    ) -> ResolveStats {
        let mut stats = ResolveStats::default();
        let (resolution, changed) = self.apply(grid, coord);
        stats.record(resolution, changed);
        for dir in Direction::ALL {
            let (resolution, changed) = self.apply(grid, coord.step(dir));
            stats.record(resolution, changed);
        }
        debug!(
            "Resolved ring around {:?}: {} changed, {} blended",
            coord, stats.changed, stats.blended
        );
        stats
    }

    /// Resolve every coordinate in the grid.
    ///
    /// Visits every cell once; meant for bulk revalidation after loading or
    /// importing a map, not for interactive edits.
    pub fn resolve_all<G: TileGrid + ?Sized>(&self, grid: &mut G) -> ResolveStats {
        let bounds = grid.bounds();
        let mut stats = ResolveStats::default();
        for coord in bounds.coords() {
            let (resolution, changed) = self.apply(grid, coord);
            stats.record(resolution, changed);
        }
        info!(
            "Resolved {} cells ({}x{}x{}): {} blended, {} flat, {} skipped, {} changed",
            stats.total(),
            bounds.width,
            bounds.height,
            bounds.layers,
            stats.blended,
            stats.flattened,
            stats.skipped,
            stats.changed
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blendmap_core::bits::*;
    use blendmap_core::{TerrainDef, TileMap};
    use std::collections::HashMap;

    fn filtered(ids: [TerrainId; 8]) -> FilteredNeighbors {
        ids.map(|id| (id != 0).then_some(id))
    }

    fn priorities() -> HashMap<TerrainId, i32> {
        HashMap::from([(5, 1), (9, 5), (12, 5), (20, 8)])
    }

    #[test]
    fn select_matches_exact_shape() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        // N and E
        let t = resolver.select_transition(&filtered([9, 0, 9, 0, 0, 0, 0, 0]));
        assert_eq!(t, Some(Transition { overlay: 9, shape: 2 }));
    }

    #[test]
    fn select_prefers_higher_priority() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        // 9 forms N|E, 20 forms S|W: both legal, 20 has the higher priority
        let t = resolver.select_transition(&filtered([9, 0, 9, 0, 20, 0, 20, 0]));
        assert_eq!(t.map(|t| t.overlay), Some(20));
        assert_eq!(t.map(|t| t.shape), find_shape(S | W).map(|i| i as u8 + 1));
    }

    #[test]
    fn select_falls_back_when_top_candidate_has_no_shape() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        // 20 sits N and S, which is not a shape; 9 forms the east edge
        let t = resolver.select_transition(&filtered([20, 9, 9, 9, 20, 0, 0, 0]));
        assert_eq!(
            t,
            Some(Transition {
                overlay: 9,
                shape: find_shape(NE | E | SE).unwrap() as u8 + 1,
            })
        );
    }

    #[test]
    fn select_fails_when_no_candidate_has_a_shape() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        // 20 -> N|S, 12 -> E|NW
        let t = resolver.select_transition(&filtered([20, 0, 12, 0, 20, 0, 0, 12]));
        assert_eq!(t, None);
    }

    #[test]
    fn select_breaks_ties_by_lowest_id() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        // 9 and 12 share priority 5 and both form legal inner corners
        let t = resolver.select_transition(&filtered([12, 0, 12, 0, 9, 0, 9, 0]));
        assert_eq!(t.map(|t| t.overlay), Some(9));
    }

    #[test]
    fn select_ignores_single_occurrences() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        assert_eq!(
            resolver.select_transition(&filtered([9, 0, 12, 0, 20, 0, 0, 0])),
            None
        );
    }

    #[test]
    fn unknown_center_terrain_ranks_lowest() {
        let catalog = TerrainCatalog::new()
            .with(TerrainDef::new(9, "Water", 5))
            .unwrap();
        // Center 4 is not in the catalog
        let mut map = TileMap::from_base_ids(3, 3, &[9, 9, 9, 4, 4, 4, 4, 4, 4]);
        let resolver = TransitionResolver::new(&catalog);
        let resolution = resolver.resolve_one(&mut map, TileCoord::new(1, 1, 0));
        assert_eq!(
            resolution,
            Resolution::Blended(Transition {
                overlay: 9,
                shape: find_shape(NW | N | NE).unwrap() as u8 + 1,
            })
        );
    }

    #[test]
    fn neighbors_outside_catalog_do_not_blend() {
        let catalog = TerrainCatalog::new()
            .with(TerrainDef::new(5, "Grass", 1))
            .unwrap();
        let mut map = TileMap::from_base_ids(3, 3, &[7, 7, 7, 5, 5, 5, 5, 5, 5]);
        let resolver = TransitionResolver::new(&catalog);
        assert_eq!(
            resolver.resolve_one(&mut map, TileCoord::new(1, 1, 0)),
            Resolution::Flattened
        );
    }

    #[test]
    fn evaluate_does_not_write() {
        let prio = priorities();
        let resolver = TransitionResolver::new(&prio);
        let map = TileMap::from_base_ids(3, 3, &[9, 9, 9, 5, 5, 5, 5, 5, 5]);
        let planned = resolver.evaluate(&map, TileCoord::new(1, 1, 0));
        assert_eq!(planned.map(|t| t.overlay_id()), Some(9));
        assert_eq!(
            map.get_tile(TileCoord::new(1, 1, 0)),
            Some(TileRecord::plain(5))
        );
        assert_eq!(resolver.evaluate(&map, TileCoord::new(7, 7, 0)), None);
    }

    #[test]
    fn stats_merge_and_total() {
        let mut a = ResolveStats {
            blended: 1,
            flattened: 2,
            skipped: 3,
            changed: 1,
        };
        a.merge(ResolveStats {
            blended: 1,
            flattened: 0,
            skipped: 0,
            changed: 1,
        });
        assert_eq!(a.total(), 7);
        assert_eq!(a.changed, 2);
    }
}
