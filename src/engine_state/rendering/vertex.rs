//! Vertex data structures for base geometries.
//!
//! Base geometries are uploaded once by the scene and then instanced, so every vertex
//! carries its full object-space attributes.

use cgmath::{Point3, Vector3};

/// A vertex of a base geometry.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 32 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeometryVertex {
    /// Object-space position, centred on the voxel
    pub position: [f32; 3],
    /// Outward unit normal of the face this vertex belongs to
    pub normal: [f32; 3],
    /// Normalised texture coordinates
    pub uv: [f32; 2],
}

impl GeometryVertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Object-space position
    /// * `normal` - Face normal as an integer offset
    /// * `u`, `v` - Texture coordinates
    pub fn new(position: Point3<f32>, normal: Vector3<i32>, u: f32, v: f32) -> Self {
        GeometryVertex {
            position: position.into(),
            normal: [normal.x as f32, normal.y as f32, normal.z as f32],
            uv: [u, v],
        }
    }
}
