//! The fixed catalog of legal transition shapes
//!
//! Each entry is an 8-bit neighbor mask (see [`Direction`]) describing where
//! the overlaying terrain sits around a tile. The table is grouped by
//! orientation (facing N, E, S, W), seven shapes each:
//!
//! | slot | shape        | north-facing example  |
//! |------|--------------|-----------------------|
//! | 0    | edge         | NW N NE               |
//! | 1    | inner corner | N E                   |
//! | 2    | corner       | N NE E                |
//! | 3    | wide corner  | NW N NE E             |
//! | 4    | wide corner  | N NE E SE             |
//! | 5    | big corner   | NW N NE E SE          |
//! | 6    | bay          | W NW N NE E           |
//!
//! Stored shape ids are 1-based positions in [`SHAPES`].

use blendmap_core::bits::*;
use blendmap_core::{Direction, SHAPE_COUNT};

/// Shapes per orientation
const SHAPES_PER_SIDE: usize = 7;

/// Legal transition masks
pub const SHAPES: [u8; SHAPE_COUNT] = [
    // Facing north
    NW | N | NE,
    N | E,
    N | NE | E,
    NW | N | NE | E,
    N | NE | E | SE,
    NW | N | NE | E | SE,
    W | NW | N | NE | E,
    // Facing east
    NE | E | SE,
    E | S,
    E | SE | S,
    NE | E | SE | S,
    E | SE | S | SW,
    NE | E | SE | S | SW,
    N | NE | E | SE | S,
    // Facing south
    SE | S | SW,
    S | W,
    S | SW | W,
    SE | S | SW | W,
    S | SW | W | NW,
    SE | S | SW | W | NW,
    E | SE | S | SW | W,
    // Facing west
    SW | W | NW,
    W | N,
    W | NW | N,
    SW | W | NW | N,
    W | NW | N | NE,
    SW | W | NW | N | NE,
    S | SW | W | NW | N,
];

/// Index of `mask` in [`SHAPES`]. Only exact matches count.
pub fn find_shape(mask: u8) -> Option<usize> {
    SHAPES.iter().position(|&shape| shape == mask)
}

/// Mask for a stored 1-based shape id. `0` and unknown ids have no mask.
pub fn shape_mask(shape_id: u8) -> Option<u8> {
    let idx = (shape_id as usize).checked_sub(1)?;
    SHAPES.get(idx).copied()
}

/// Which way a shape faces: the side its overlay comes from
pub fn shape_facing(shape_id: u8) -> Option<Direction> {
    shape_mask(shape_id)?;
    let side = (shape_id as usize - 1) / SHAPES_PER_SIDE;
    Some(Direction::ALL[side * 2])
}

/// 3x3 text picture of a mask: `#` where the overlay sits, `o` for the tile
pub fn mask_diagram(mask: u8) -> String {
    let cell = |dir: Direction| if mask & dir.bit() != 0 { '#' } else { '.' };
    format!(
        "{}{}{}\n{}o{}\n{}{}{}",
        cell(Direction::NorthWest),
        cell(Direction::North),
        cell(Direction::NorthEast),
        cell(Direction::West),
        cell(Direction::East),
        cell(Direction::SouthWest),
        cell(Direction::South),
        cell(Direction::SouthEast),
    )
}
