//! Physics side of the voxel core.
//!
//! Each chunk with solid voxels owns one static triangle-mesh body in an external
//! [`PhysicsWorld`]. The mesh is the union of one box per solid voxel, merged into a
//! single vertex/index buffer so the physics engine sees one shape per chunk.

pub mod collision;
pub mod merge;

use cgmath::Point3;

use crate::error::VoxelResult;

pub use collision::ChunkCollisionBuilder;
pub use merge::{BoxVolume, MergedCollisionMesh};

/// Handle to a collision shape owned by the physics world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u64);

/// Handle to a rigid body owned by the physics world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle(pub u64);

/// External physics engine collision bodies are built into.
pub trait PhysicsWorld {
    /// Creates a static triangle-mesh shape from world-space geometry.
    fn create_static_mesh_shape(&mut self, mesh: &MergedCollisionMesh) -> VoxelResult<ShapeHandle>;

    /// Creates a zero-mass body using `shape`, positioned at `origin`.
    fn create_static_body(
        &mut self,
        shape: ShapeHandle,
        origin: Point3<f32>,
    ) -> VoxelResult<BodyHandle>;

    /// Removes a body from the simulation.
    fn remove_body(&mut self, body: BodyHandle);

    /// Releases a shape. Only called once no body uses it.
    fn remove_shape(&mut self, shape: ShapeHandle);
}
