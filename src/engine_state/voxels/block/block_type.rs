//! # Block Type Module
//!
//! This module defines block type identifiers and the data-driven definition of a
//! block type: solidity, textures, optional auto-tile atlas and per-type transform.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

use super::block_side::FaceGroup;

/// Identifier of a block type, e.g. `"stone"` or `"grass"`.
///
/// Voxel records refer to their type by this id; the catalog resolves it to a
/// `BlockDefinition`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockTypeId(String);

impl BlockTypeId {
    /// Creates a block type id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        BlockTypeId(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockTypeId {
    fn from(id: &str) -> Self {
        BlockTypeId::new(id)
    }
}

impl From<String> for BlockTypeId {
    fn from(id: String) -> Self {
        BlockTypeId(id)
    }
}

impl Borrow<str> for BlockTypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Texture references for the faces of a block.
///
/// `side` is mandatory; `top` and `bottom` fall back to it when absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockTextures {
    pub side: String,
    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,
}

/// Auto-tile atlas description for blocks whose top face follows their neighbours.
///
/// The atlas is a grid of `atlas_columns` x `atlas_rows` tiles. See
/// `rendering::autotile` for the tile layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTileConfig {
    pub atlas_texture_id: String,
    pub atlas_columns: u32,
    pub atlas_rows: u32,
}

/// A single block type definition, as supplied by the external block catalog.
///
/// # Examples
///
/// ```
/// use voxel_chunk_core::BlockDefinition;
///
/// let grass: BlockDefinition = serde_json::from_str(r#"{
///     "id": "grass",
///     "textures": { "side": "grass_side.png", "bottom": "dirt.png" },
///     "autoTile": { "atlasTextureId": "grass_atlas.png", "atlasColumns": 4, "atlasRows": 5 }
/// }"#).unwrap();
///
/// assert!(grass.is_solid);
/// assert!(grass.auto_tile.is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDefinition {
    pub id: BlockTypeId,
    #[serde(default = "default_solid")]
    pub is_solid: bool,
    pub textures: BlockTextures,
    #[serde(default)]
    pub auto_tile: Option<AutoTileConfig>,
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
    #[serde(default)]
    pub offset: Option<[f32; 3]>,
}

fn default_solid() -> bool {
    true
}

impl BlockDefinition {
    /// Creates a solid, single-texture block definition.
    pub fn solid(id: impl Into<String>, texture: impl Into<String>) -> Self {
        BlockDefinition {
            id: BlockTypeId::new(id),
            is_solid: true,
            textures: BlockTextures {
                side: texture.into(),
                top: None,
                bottom: None,
            },
            auto_tile: None,
            scale: None,
            offset: None,
        }
    }

    /// Resolves the texture reference used by a face group.
    ///
    /// The top face of an auto-tiled block samples the atlas; everything else falls back
    /// to the side texture when no dedicated texture is given.
    pub fn texture_for(&self, group: FaceGroup) -> &str {
        match group {
            FaceGroup::Side => &self.textures.side,
            FaceGroup::Top => match (&self.auto_tile, &self.textures.top) {
                (Some(auto_tile), _) => &auto_tile.atlas_texture_id,
                (None, Some(top)) => top,
                (None, None) => &self.textures.side,
            },
            FaceGroup::Bottom => self
                .textures
                .bottom
                .as_deref()
                .unwrap_or(&self.textures.side),
        }
    }

    /// Every distinct texture reference this block needs, side first.
    pub fn texture_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::with_capacity(3);
        for group in [FaceGroup::Side, FaceGroup::Top, FaceGroup::Bottom] {
            let path = self.texture_for(group);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Per-type translation applied to every instance, in world units.
    pub fn offset(&self) -> [f32; 3] {
        self.offset.unwrap_or([0.0; 3])
    }

    /// Per-type scale applied to every instance.
    pub fn scale(&self) -> [f32; 3] {
        self.scale.unwrap_or([1.0; 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_and_bottom_fall_back_to_side() {
        let stone = BlockDefinition::solid("stone", "stone.png");
        assert_eq!(stone.texture_for(FaceGroup::Top), "stone.png");
        assert_eq!(stone.texture_for(FaceGroup::Bottom), "stone.png");
        assert_eq!(stone.texture_paths(), vec!["stone.png"]);
    }

    #[test]
    fn auto_tile_atlas_overrides_top_texture() {
        let mut grass = BlockDefinition::solid("grass", "grass_side.png");
        grass.textures.top = Some("grass_top.png".into());
        grass.textures.bottom = Some("dirt.png".into());
        grass.auto_tile = Some(AutoTileConfig {
            atlas_texture_id: "grass_atlas.png".into(),
            atlas_columns: 4,
            atlas_rows: 5,
        });

        assert_eq!(grass.texture_for(FaceGroup::Top), "grass_atlas.png");
        assert_eq!(
            grass.texture_paths(),
            vec!["grass_side.png", "grass_atlas.png", "dirt.png"]
        );
    }

    #[test]
    fn missing_transform_is_identity() {
        let stone = BlockDefinition::solid("stone", "stone.png");
        assert_eq!(stone.offset(), [0.0; 3]);
        assert_eq!(stone.scale(), [1.0; 3]);
    }
}
