//! Error handling for the voxel core.
//!
//! Almost nothing in the chunk pipeline is fatal: unknown block types, missing textures
//! and failed collision merges are logged and recovered per chunk. `VoxelError` is the
//! value those recoveries log, and the error returned by the few genuinely fallible
//! entry points (catalog and config parsing, collaborator calls).

use std::fmt::Display;

/// Type alias for results produced by this crate and its collaborators.
pub type VoxelResult<T> = Result<T, VoxelError>;

/// Errors raised by the voxel core or reported by its external collaborators.
#[derive(Debug, thiserror::Error)]
pub enum VoxelError {
    #[error("Unknown block type: {block_type}")]
    UnknownBlockType { block_type: String },

    #[error("Texture '{path}' failed to load: {message}")]
    TextureLoad { path: String, message: String },

    #[error("Scene operation '{operation}' failed: {message}")]
    Scene { operation: String, message: String },

    #[error("Physics operation '{operation}' failed: {message}")]
    Physics { operation: String, message: String },

    #[error("Collision merge failed for chunk {x}, {y}, {z}: {message}")]
    CollisionMerge {
        x: i32,
        y: i32,
        z: i32,
        message: String,
    },

    #[error("Failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Create a scene error for a failed rendering-engine call.
pub fn scene_error(operation: &str, error: impl Display) -> VoxelError {
    VoxelError::Scene {
        operation: operation.to_string(),
        message: error.to_string(),
    }
}

/// Create a physics error for a failed physics-world call.
pub fn physics_error(operation: &str, error: impl Display) -> VoxelError {
    VoxelError::Physics {
        operation: operation.to_string(),
        message: error.to_string(),
    }
}

/// Create a texture load error.
pub fn texture_error(path: &str, error: impl Display) -> VoxelError {
    VoxelError::TextureLoad {
        path: path.to_string(),
        message: error.to_string(),
    }
}
