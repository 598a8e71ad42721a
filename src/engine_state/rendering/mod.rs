//! Rendering side of the voxel core.
//!
//! The core never talks to a GPU API directly. It drives an external [`Scene`] through
//! a handful of create/dispose calls and keeps the returned opaque handles, so the
//! same chunk logic can sit on top of any engine that supports instanced drawing.
//!
//! # Architecture
//! - [`meshing`]: Per-chunk instance batches and the base cube geometry
//! - [`autotile`]: Neighbour-aware top face tile selection
//! - [`resource_cache`]: Textures, materials and base geometries shared across chunks
//! - [`texture`]: The asynchronous texture loading boundary

pub mod autotile;
mod instance;
pub mod meshing;
pub mod resource_cache;
pub mod texture;
mod vertex;

pub use instance::InstanceTransform;
pub use meshing::mesh::BaseGeometry;
pub use texture::{TextureHandle, TextureLoader};
pub use vertex::GeometryVertex;

use crate::error::VoxelResult;

/// Handle to a scene graph node that groups a chunk's instances.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub u64);

/// Handle to a base geometry uploaded to the scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Handle to a material created in the scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u64);

/// Handle to a single drawn instance of a base geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle(pub u64);

/// What a material should look like.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialDescriptor {
    /// A material sampling a loaded texture.
    Textured { texture: TextureHandle, path: String },
    /// An untextured material used when a texture is missing.
    FlatColor { color: [f32; 4] },
}

/// External rendering engine the core builds visuals into.
///
/// Every created resource is owned by the core until it calls the matching dispose
/// method. Creation may fail; the core logs the failure and recovers per chunk.
pub trait Scene {
    /// Creates an empty group node attached to the scene root.
    fn create_group(&mut self, name: &str) -> VoxelResult<NodeHandle>;

    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> VoxelResult<MaterialHandle>;

    fn create_geometry(&mut self, geometry: &BaseGeometry) -> VoxelResult<GeometryHandle>;

    /// Draws `geometry` once more, under `parent`, with the given transform.
    fn create_instance(
        &mut self,
        geometry: GeometryHandle,
        transform: &InstanceTransform,
        parent: NodeHandle,
    ) -> VoxelResult<InstanceHandle>;

    fn dispose_instance(&mut self, instance: InstanceHandle);

    /// Detaches a group node from the scene and releases it.
    fn dispose_node(&mut self, node: NodeHandle);

    fn dispose_geometry(&mut self, geometry: GeometryHandle);

    fn dispose_material(&mut self, material: MaterialHandle);
}
