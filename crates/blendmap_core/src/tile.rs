//! Packed tile records
//!
//! A tile record is a single 32-bit value with a fixed layout:
//!
//! | bits  | field     | range |
//! |-------|-----------|-------|
//! | 0-4   | base id   | 0-31  |
//! | 5-9   | overlay   | 0-31  |
//! | 10-15 | shape     | 0-63  |
//! | 16-31 | base high | reserved base ids only |
//!
//! Terrain ids `1..=31` fit entirely in the base field. Larger base ids are
//! reserved for non-terrain content; their high bits spill into bits 16-31 so
//! they can still be stored and recognized, but they never take part in
//! transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a base terrain type. `0` means "no terrain".
pub type TerrainId = u32;

/// Lowest terrain id that can take part in transitions
pub const MIN_TERRAIN_ID: TerrainId = 1;
/// Highest terrain id that can take part in transitions
pub const MAX_TERRAIN_ID: TerrainId = 31;

/// Number of entries in the transition shape catalog.
///
/// Shape ids stored in a [`TileRecord`] are 1-based indices into that catalog;
/// `0` means "no overlay".
pub const SHAPE_COUNT: usize = 28;

const BASE_MASK: u32 = 0x1F;
const OVERLAY_SHIFT: u32 = 5;
const OVERLAY_MASK: u32 = 0x1F;
const SHAPE_SHIFT: u32 = 10;
const SHAPE_MASK: u32 = 0x3F;
const BASE_HIGH_SHIFT: u32 = 16;
const BASE_LOW_BITS: u32 = 5;

/// Returns `true` if `id` can take part in transitions (`1..=31`).
pub fn is_terrain_id(id: TerrainId) -> bool {
    (MIN_TERRAIN_ID..=MAX_TERRAIN_ID).contains(&id)
}

/// A packed tile value: base terrain, contributing overlay terrain and shape.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileRecord(u32);

impl TileRecord {
    /// A tile with no terrain at all
    pub const EMPTY: Self = TileRecord(0);

    /// Pack `base`, `overlay` and `shape` into a record.
    ///
    /// Inputs are masked to their field widths (5, 5 and 6 bits).
    pub const fn encode(base: TerrainId, overlay: TerrainId, shape: u8) -> Self {
        TileRecord(
            (base & BASE_MASK)
                | ((overlay & OVERLAY_MASK) << OVERLAY_SHIFT)
                | ((shape as u32 & SHAPE_MASK) << SHAPE_SHIFT),
        )
    }

    /// A flat tile of the given base id, with no overlay.
    ///
    /// Unlike [`encode`](Self::encode) this accepts reserved ids above 31.
    /// Ids wider than 21 bits are truncated.
    pub const fn plain(base: TerrainId) -> Self {
        let high = base >> BASE_LOW_BITS;
        TileRecord((base & BASE_MASK) | (high << BASE_HIGH_SHIFT))
    }

    /// Wrap a raw stored value
    pub const fn from_raw(raw: u32) -> Self {
        TileRecord(raw)
    }

    /// The raw stored value
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Unpack into `(base, overlay, shape)`
    pub const fn decode(self) -> (TerrainId, TerrainId, u8) {
        (self.base_id(), self.overlay_id(), self.shape_id())
    }

    /// The tile's own terrain id, independent of any overlay
    pub const fn base_id(self) -> TerrainId {
        (self.0 & BASE_MASK) | ((self.0 >> BASE_HIGH_SHIFT) << BASE_LOW_BITS)
    }

    /// The neighboring terrain contributing the blend.
    /// Meaningless when [`shape_id`](Self::shape_id) is `0`.
    pub const fn overlay_id(self) -> TerrainId {
        (self.0 >> OVERLAY_SHIFT) & OVERLAY_MASK
    }

    /// 1-based shape catalog index, `0` for a flat tile
    pub const fn shape_id(self) -> u8 {
        ((self.0 >> SHAPE_SHIFT) & SHAPE_MASK) as u8
    }

    /// Whether this record carries a blend overlay
    pub const fn has_overlay(self) -> bool {
        self.shape_id() != 0
    }

    /// Whether the base id is a transition-capable terrain id
    pub fn is_terrain(self) -> bool {
        is_terrain_id(self.base_id())
    }

    /// The same base terrain with any overlay stripped
    pub const fn flattened(self) -> Self {
        TileRecord::plain(self.base_id())
    }
}

impl fmt::Debug for TileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, overlay, shape) = self.decode();
        if shape == 0 {
            write!(f, "TileRecord({base})")
        } else {
            write!(f, "TileRecord({base} +{overlay}#{shape})")
        }
    }
}

impl From<TileRecord> for u32 {
    fn from(tile: TileRecord) -> Self {
        tile.0
    }
}
