//! # Block Module
//!
//! This module provides the block catalog: the read-only table of block type
//! definitions that voxel records refer to by id.

use std::collections::HashMap;

use log::warn;
use serde::Deserialize;

use crate::error::{VoxelError, VoxelResult};

pub mod block_side;
pub mod block_type;

pub use block_type::{AutoTileConfig, BlockDefinition, BlockTextures, BlockTypeId};

/// JSON layout of a block catalog file: `{ "blocks": [ ... ] }`.
#[derive(Deserialize)]
struct CatalogFile {
    blocks: Vec<BlockDefinition>,
}

/// Static table of block type definitions, keyed by id.
///
/// The catalog is supplied by the embedding application and never mutated by the
/// chunk pipeline.
///
/// # Examples
///
/// ```
/// use voxel_chunk_core::BlockCatalog;
///
/// let catalog = BlockCatalog::from_json_str(r#"{ "blocks": [
///     { "id": "stone", "textures": { "side": "stone.png" } },
///     { "id": "water", "isSolid": false, "textures": { "side": "water.png" } }
/// ] }"#).unwrap();
///
/// assert!(catalog.is_solid_type("stone"));
/// assert!(!catalog.is_solid_type("water"));
/// assert!(!catalog.is_solid_type("unknown"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BlockCatalog {
    definitions: HashMap<BlockTypeId, BlockDefinition>,
}

impl BlockCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of definitions.
    ///
    /// Later definitions replace earlier ones with the same id.
    pub fn from_definitions(definitions: impl IntoIterator<Item = BlockDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.register(definition);
        }
        catalog
    }

    /// Parses a catalog from `{ "blocks": [...] }` JSON.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|source| VoxelError::Parse {
            what: "block catalog",
            source,
        })?;
        Ok(Self::from_definitions(file.blocks))
    }

    /// Adds a definition, replacing any previous definition with the same id.
    pub fn register(&mut self, definition: BlockDefinition) {
        if let Some(previous) = self
            .definitions
            .insert(definition.id.clone(), definition)
        {
            warn!("Block type '{}' defined twice, keeping the last one", previous.id);
        }
    }

    /// Looks up a block type definition.
    pub fn get(&self, id: &str) -> Option<&BlockDefinition> {
        self.definitions.get(id)
    }

    /// Looks up a block type definition, reporting unknown ids as an error.
    pub fn require(&self, id: &str) -> VoxelResult<&BlockDefinition> {
        self.get(id).ok_or_else(|| VoxelError::UnknownBlockType {
            block_type: id.to_string(),
        })
    }

    /// Returns `true` if the type exists and is solid. Unknown types are not solid.
    pub fn is_solid_type(&self, id: &str) -> bool {
        self.get(id).is_some_and(|definition| definition.is_solid)
    }

    /// Iterates over all definitions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.definitions.values()
    }

    /// Number of block types in the catalog.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns `true` if the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_ids_keep_the_last_definition() {
        let mut first = BlockDefinition::solid("stone", "old.png");
        first.is_solid = false;
        let second = BlockDefinition::solid("stone", "new.png");

        let catalog = BlockCatalog::from_definitions([first, second]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("stone").unwrap().textures.side, "new.png");
        assert!(catalog.is_solid_type("stone"));
    }

    #[test]
    fn require_reports_unknown_types() {
        let catalog = BlockCatalog::new();
        let err = catalog.require("lava").unwrap_err();
        assert!(matches!(err, VoxelError::UnknownBlockType { block_type } if block_type == "lava"));
    }

    #[test]
    fn invalid_catalog_json_is_rejected() {
        let err = BlockCatalog::from_json_str(r#"{ "blocks": [ { "id": "x" } ] }"#).unwrap_err();
        assert!(matches!(err, VoxelError::Parse { what: "block catalog", .. }));
    }
}
