//! The 8 neighbor directions around a tile
//!
//! Directions are ordered clockwise starting at North, and each one owns a
//! fixed bit in an 8-bit neighbor mask:
//!
//! ```text
//!   NW(7) | N(0) | NE(1)
//!   W(6)  |  X   | E(2)
//!   SW(5) | S(4) | SE(3)
//! ```
//!
//! The transition shape catalog is written against these exact bit positions,
//! so the order must never change. North is `y - 1` (rows grow downward).

use serde::{Deserialize, Serialize};

/// One of the 8 compass neighbor offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

/// Mask bits for each direction
pub mod bits {
    pub const N: u8 = 0b0000_0001;
    pub const NE: u8 = 0b0000_0010;
    pub const E: u8 = 0b0000_0100;
    pub const SE: u8 = 0b0000_1000;
    pub const S: u8 = 0b0001_0000;
    pub const SW: u8 = 0b0010_0000;
    pub const W: u8 = 0b0100_0000;
    pub const NW: u8 = 0b1000_0000;
}

impl Direction {
    /// All directions in mask bit order
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Bit position `0..8` of this direction
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this direction
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Grid offset `(dx, dy)` of the neighbor in this direction
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    /// The direction pointing back at us from the neighbor
    pub const fn opposite(self) -> Direction {
        Direction::ALL[(self as usize + 4) % 8]
    }

    /// Corners are the diagonal directions
    pub const fn is_corner(self) -> bool {
        (self as usize) % 2 == 1
    }

    /// Short compass label, used in logs and diagrams
    pub const fn label(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::South => "S",
            Direction::SouthWest => "SW",
            Direction::West => "W",
            Direction::NorthWest => "NW",
        }
    }
}
