//! Editing helpers built on the resolver
//!
//! These are what a terrain brush calls: write a base terrain, then fix up the
//! overlays around it.

use blendmap_core::{PreviewGrid, TerrainId, TerrainPriority, TileCoord, TileGrid, TileRecord};
use tracing::debug;

use crate::resolver::TransitionResolver;

/// The edited cell and its 8 neighbors
fn ring(coord: TileCoord) -> [TileCoord; 9] {
    let n = coord.neighbors();
    [coord, n[0], n[1], n[2], n[3], n[4], n[5], n[6], n[7]]
}

/// Paint a flat `terrain` tile at `coord` and re-resolve the surrounding ring.
///
/// Returns the coordinates whose stored value changed, sorted. Painting
/// outside the grid does nothing.
pub fn paint_terrain<G, C>(
    resolver: &TransitionResolver<'_, C>,
    grid: &mut G,
    coord: TileCoord,
    terrain: TerrainId,
) -> Vec<TileCoord>
where
    G: TileGrid + ?Sized,
    C: TerrainPriority + ?Sized,
{
    if !grid.bounds().contains(coord) {
        return Vec::new();
    }

    let cells = ring(coord);
    let before = cells.map(|c| grid.get_tile(c));

    grid.set_tile(coord, TileRecord::plain(terrain));
    resolver.resolve_with_neighbors(grid, coord);

    let mut changed: Vec<TileCoord> = cells
        .iter()
        .zip(before)
        .filter(|(c, old)| grid.get_tile(**c) != *old)
        .map(|(c, _)| *c)
        .collect();
    changed.sort();
    debug!(
        "Painted terrain {} at {:?}: {} tiles changed",
        terrain,
        coord,
        changed.len()
    );
    changed
}

/// Erase the terrain at `coord` (base id `0`) and re-resolve its neighbors.
///
/// Empty cells stay empty. Returns the coordinates whose stored value
/// changed.
pub fn erase_terrain<G, C>(
    resolver: &TransitionResolver<'_, C>,
    grid: &mut G,
    coord: TileCoord,
) -> Vec<TileCoord>
where
    G: TileGrid + ?Sized,
    C: TerrainPriority + ?Sized,
{
    if grid.get_tile(coord).is_none() {
        return Vec::new();
    }
    paint_terrain(resolver, grid, coord, 0)
}

/// The tiles [`paint_terrain`] would write, without touching `grid`
pub fn preview_paint<G, C>(
    resolver: &TransitionResolver<'_, C>,
    grid: &G,
    coord: TileCoord,
    terrain: TerrainId,
) -> Vec<(TileCoord, TileRecord)>
where
    G: TileGrid + ?Sized,
    C: TerrainPriority + ?Sized,
{
    let mut preview = PreviewGrid::new(grid);
    paint_terrain(resolver, &mut preview, coord, terrain);
    preview.changes()
}
