//! Automatic terrain transition resolver
//!
//! Given a grid of tiles that each reference a base terrain, this crate
//! decides which blended edge/corner overlay every tile should carry, purely
//! from the terrains around it. Higher-priority terrains blend on top of
//! lower-priority ones.
//!
//! This crate has no engine dependency. It operates on any
//! [`TileGrid`](blendmap_core::TileGrid) and any
//! [`TerrainPriority`](blendmap_core::TerrainPriority) source.
//!
//! # Example
//!
//! ```rust
//! use blendmap_core::{TerrainCatalog, TerrainDef, TileCoord, TileGrid, TileMap};
//! use blendmap_transition::TransitionResolver;
//!
//! let catalog = TerrainCatalog::new()
//!     .with(TerrainDef::new(5, "Grass", 1)).unwrap()
//!     .with(TerrainDef::new(9, "Water", 5)).unwrap();
//!
//! // Water to the north and east of the center tile
//! let mut map = TileMap::from_base_ids(3, 3, &[
//!     5, 9, 5,
//!     5, 5, 9,
//!     5, 5, 5,
//! ]);
//!
//! let resolver = TransitionResolver::new(&catalog);
//! resolver.resolve_all(&mut map);
//!
//! let center = map.get_tile(TileCoord::new(1, 1, 0)).unwrap();
//! assert_eq!(center.decode(), (5, 9, 2));
//! ```

pub mod neighborhood;
pub mod paint;
pub mod resolver;
pub mod shapes;

pub use paint::{erase_terrain, paint_terrain, preview_paint};
pub use resolver::{Resolution, ResolveStats, Transition, TransitionResolver};
pub use shapes::{find_shape, mask_diagram, shape_facing, shape_mask, SHAPES};

// Re-export blendmap_core
pub use blendmap_core;
