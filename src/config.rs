//! # World Configuration
//!
//! Runtime knobs for a `VoxelWorld`. The chunk dimension is not among them; it is the
//! compile-time constant `CHUNK_DIMENSION`.

use serde::{Deserialize, Serialize};

use crate::error::{VoxelError, VoxelResult};

/// Magenta, the classic "texture missing" colour.
pub const DEFAULT_FALLBACK_COLOR: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

/// Configuration for a voxel world.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
///
/// # Examples
///
/// ```
/// use voxel_chunk_core::WorldConfig;
///
/// let config = WorldConfig::from_json_str(r#"{ "voxelSize": 0.5 }"#).unwrap();
/// assert_eq!(config.voxel_size, 0.5);
/// assert!(config.collision_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorldConfig {
    /// Edge length of one voxel in world units.
    pub voxel_size: f32,
    /// Colour of the flat material substituted for textures that fail to load.
    pub fallback_color: [f32; 4],
    /// Whether collision rebuilds are tracked at all (also requires a physics world).
    pub collision_enabled: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            fallback_color: DEFAULT_FALLBACK_COLOR,
            collision_enabled: true,
        }
    }
}

impl WorldConfig {
    /// Parses a configuration from JSON, filling omitted fields with defaults.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        serde_json::from_str(json).map_err(|source| VoxelError::Parse {
            what: "world config",
            source,
        })
    }
}
