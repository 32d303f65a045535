//! Terrain catalog: terrain id -> priority and overlay graphics
//!
//! The catalog is plain configuration, loaded from TOML or JSON:
//!
//! ```toml
//! [[terrains]]
//! id = 5
//! name = "Grass"
//! priority = 1
//!
//! [[terrains]]
//! id = 9
//! name = "Water"
//! priority = 5
//! overlays = [100, 101, 102, ...] # one graphic per transition shape
//! ```

use crate::tile::{is_terrain_id, TerrainId, TileRecord, MAX_TERRAIN_ID, SHAPE_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or building a terrain catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to parse catalog TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Terrain id {0} is outside 1..=31")]
    TerrainIdOutOfRange(TerrainId),
    #[error("Terrain id {0} is defined more than once")]
    DuplicateTerrain(TerrainId),
    #[error("Terrain {id} has {found} overlay graphics, expected {expected}")]
    GraphicSetSize {
        id: TerrainId,
        expected: usize,
        found: usize,
    },
}

/// Blend precedence lookup.
///
/// `None` means the id has no entry and cannot take part in transitions.
pub trait TerrainPriority {
    fn priority_of(&self, id: TerrainId) -> Option<i32>;
}

impl TerrainPriority for HashMap<TerrainId, i32> {
    fn priority_of(&self, id: TerrainId) -> Option<i32> {
        self.get(&id).copied()
    }
}

impl<T: TerrainPriority + ?Sized> TerrainPriority for &T {
    fn priority_of(&self, id: TerrainId) -> Option<i32> {
        (**self).priority_of(id)
    }
}

/// One base terrain type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainDef {
    pub id: TerrainId,
    pub name: String,
    /// Higher priorities blend on top of lower ones
    pub priority: i32,
    /// Overlay graphic per transition shape, indexed by `shape_id - 1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlays: Option<Vec<u32>>,
}

impl TerrainDef {
    pub fn new(id: TerrainId, name: impl Into<String>, priority: i32) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
            overlays: None,
        }
    }

    pub fn with_overlays(mut self, overlays: Vec<u32>) -> Self {
        self.overlays = Some(overlays);
        self
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    terrains: Vec<TerrainDef>,
}

/// All known terrain types, addressable by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "CatalogFile", into = "CatalogFile")]
pub struct TerrainCatalog {
    terrains: Vec<TerrainDef>,
    /// terrain id -> index into `terrains`
    slots: [Option<usize>; MAX_TERRAIN_ID as usize + 1],
}

impl TryFrom<CatalogFile> for TerrainCatalog {
    type Error = CatalogError;

    fn try_from(file: CatalogFile) -> Result<Self, Self::Error> {
        let mut catalog = TerrainCatalog::new();
        for def in file.terrains {
            catalog.insert(def)?;
        }
        Ok(catalog)
    }
}

impl From<TerrainCatalog> for CatalogFile {
    fn from(catalog: TerrainCatalog) -> Self {
        CatalogFile {
            terrains: catalog.terrains,
        }
    }
}

impl TerrainCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a terrain, rejecting out-of-range ids, duplicates and
    /// wrongly sized graphic sets
    pub fn insert(&mut self, def: TerrainDef) -> Result<(), CatalogError> {
        if !is_terrain_id(def.id) {
            return Err(CatalogError::TerrainIdOutOfRange(def.id));
        }
        if self.slots[def.id as usize].is_some() {
            return Err(CatalogError::DuplicateTerrain(def.id));
        }
        if let Some(overlays) = &def.overlays {
            if overlays.len() != SHAPE_COUNT {
                return Err(CatalogError::GraphicSetSize {
                    id: def.id,
                    expected: SHAPE_COUNT,
                    found: overlays.len(),
                });
            }
        }
        self.slots[def.id as usize] = Some(self.terrains.len());
        self.terrains.push(def);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, def: TerrainDef) -> Result<Self, CatalogError> {
        self.insert(def)?;
        Ok(self)
    }

    /// Look up a terrain by id
    pub fn get(&self, id: TerrainId) -> Option<&TerrainDef> {
        let slot = self.slots.get(id as usize).copied().flatten()?;
        self.terrains.get(slot)
    }

    /// Look up a terrain by name
    pub fn find_by_name(&self, name: &str) -> Option<&TerrainDef> {
        self.terrains.iter().find(|t| t.name == name)
    }

    /// Terrains in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &TerrainDef> {
        self.terrains.iter()
    }

    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    /// Graphic a renderer should draw on top of `tile`'s base.
    ///
    /// Returns `None` for flat tiles, overlays without a graphic set, and
    /// shape ids outside the catalog.
    pub fn overlay_graphic(&self, tile: TileRecord) -> Option<u32> {
        let shape = tile.shape_id() as usize;
        if shape == 0 || shape > SHAPE_COUNT {
            return None;
        }
        let overlays = self.get(tile.overlay_id())?.overlays.as_ref()?;
        overlays.get(shape - 1).copied()
    }

    /// Parse a catalog from TOML
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::try_from(file)
    }

    /// Parse a catalog from JSON
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Self::try_from(file)
    }

    /// Load a catalog from a `.json` file, or TOML for any other extension
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        if catalog.is_empty() {
            tracing::warn!("Terrain catalog {} defines no terrains", path.display());
        }
        Ok(catalog)
    }
}

impl TerrainPriority for TerrainCatalog {
    fn priority_of(&self, id: TerrainId) -> Option<i32> {
        self.get(id).map(|t| t.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphics(first: u32) -> Vec<u32> {
        (first..first + SHAPE_COUNT as u32).collect()
    }

    #[test]
    fn test_insert_and_lookup() {
        let catalog = TerrainCatalog::new()
            .with(TerrainDef::new(5, "Grass", 1))
            .unwrap()
            .with(TerrainDef::new(9, "Water", 5))
            .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.priority_of(5), Some(1));
        assert_eq!(catalog.priority_of(9), Some(5));
        assert_eq!(catalog.priority_of(7), None);
        assert_eq!(catalog.priority_of(0), None);
        assert_eq!(catalog.priority_of(400), None);
        assert_eq!(catalog.find_by_name("Water").map(|t| t.id), Some(9));
    }

    #[test]
    fn test_rejects_invalid_entries() {
        let mut catalog = TerrainCatalog::new();
        assert!(matches!(
            catalog.insert(TerrainDef::new(0, "Void", 1)),
            Err(CatalogError::TerrainIdOutOfRange(0))
        ));
        assert!(matches!(
            catalog.insert(TerrainDef::new(32, "Reserved", 1)),
            Err(CatalogError::TerrainIdOutOfRange(32))
        ));

        catalog.insert(TerrainDef::new(3, "Sand", 2)).unwrap();
        assert!(matches!(
            catalog.insert(TerrainDef::new(3, "Sand again", 4)),
            Err(CatalogError::DuplicateTerrain(3))
        ));
        assert!(matches!(
            catalog.insert(TerrainDef::new(4, "Rock", 4).with_overlays(vec![1, 2, 3])),
            Err(CatalogError::GraphicSetSize {
                id: 4,
                expected: SHAPE_COUNT,
                found: 3
            })
        ));
    }

    #[test]
    fn test_overlay_graphic_lookup() {
        let catalog = TerrainCatalog::new()
            .with(TerrainDef::new(5, "Grass", 1))
            .unwrap()
            .with(TerrainDef::new(9, "Water", 5).with_overlays(graphics(100)))
            .unwrap();

        assert_eq!(
            catalog.overlay_graphic(TileRecord::encode(5, 9, 1)),
            Some(100)
        );
        assert_eq!(
            catalog.overlay_graphic(TileRecord::encode(5, 9, SHAPE_COUNT as u8)),
            Some(127)
        );
        // Flat tile
        assert_eq!(catalog.overlay_graphic(TileRecord::plain(5)), None);
        // Corrupt shape index
        assert_eq!(catalog.overlay_graphic(TileRecord::encode(5, 9, 40)), None);
        // Overlay terrain without graphics
        assert_eq!(catalog.overlay_graphic(TileRecord::encode(9, 5, 2)), None);
        // Overlay terrain not in the catalog
        assert_eq!(catalog.overlay_graphic(TileRecord::encode(5, 12, 2)), None);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [[terrains]]
            id = 5
            name = "Grass"
            priority = 1

            [[terrains]]
            id = 9
            name = "Water"
            priority = 5
        "#;
        let catalog = TerrainCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.priority_of(9), Some(5));
    }

    #[test]
    fn test_parse_json_validates() {
        let json = r#"{ "terrains": [ { "id": 40, "name": "Bad", "priority": 1 } ] }"#;
        assert!(TerrainCatalog::from_json_str(json).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let catalog = TerrainCatalog::new()
            .with(TerrainDef::new(2, "Dirt", 3).with_overlays(graphics(10)))
            .unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let loaded = TerrainCatalog::from_json_str(&json).unwrap();
        assert_eq!(loaded.get(2), catalog.get(2));
    }

    #[test]
    fn test_load_picks_format_by_extension() {
        let dir = std::env::temp_dir().join(format!("blendmap_catalog_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("terrain.toml");
        std::fs::write(&toml_path, "[[terrains]]\nid = 4\nname = \"Snow\"\npriority = 2\n")
            .unwrap();
        let json_path = dir.join("terrain.json");
        std::fs::write(
            &json_path,
            r#"{ "terrains": [ { "id": 6, "name": "Rock", "priority": 7 } ] }"#,
        )
        .unwrap();

        let from_toml = TerrainCatalog::load(&toml_path).unwrap();
        let from_json = TerrainCatalog::load(&json_path).unwrap();
        assert_eq!(from_toml.find_by_name("Snow").map(|t| t.id), Some(4));
        assert_eq!(from_json.priority_of(6), Some(7));
        assert!(matches!(
            TerrainCatalog::load(&dir.join("missing.toml")),
            Err(CatalogError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
