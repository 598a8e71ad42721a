//! # Collision Mesh Merging
//!
//! One axis-aligned box per solid voxel, concatenated into a single triangle mesh.
//! Vertices are not welded: each box keeps its own 8 corners, which keeps merging a
//! straight copy with an index offset.

use cgmath::{Point3, Vector3};

use crate::error::{VoxelError, VoxelResult};

/// Corner offsets of a box, bit 0 = x, bit 1 = y, bit 2 = z.
const BOX_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Two outward-wound triangles per face.
const BOX_TRIANGLES: [[u32; 3]; 12] = [
    // -X
    [0, 4, 6],
    [0, 6, 2],
    // +X
    [1, 3, 7],
    [1, 7, 5],
    // -Y
    [0, 1, 5],
    [0, 5, 4],
    // +Y
    [2, 6, 7],
    [2, 7, 3],
    // -Z
    [0, 2, 3],
    [0, 3, 1],
    // +Z
    [4, 5, 7],
    [4, 7, 6],
];

/// An axis-aligned box in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxVolume {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoxVolume {
    /// The box occupied by the voxel at `cell`: `[(cell - 0.5) * size, (cell + 0.5) * size]`.
    pub fn voxel(cell: Point3<i32>, voxel_size: f32) -> Self {
        let center = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32) * voxel_size;
        let half = Vector3::new(0.5, 0.5, 0.5) * voxel_size;
        BoxVolume {
            min: center - half,
            max: center + half,
        }
    }

    fn corners(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        BOX_CORNERS.iter().map(move |corner| {
            [
                self.min.x + corner[0] * (self.max.x - self.min.x),
                self.min.y + corner[1] * (self.max.y - self.min.y),
                self.min.z + corner[2] * (self.max.z - self.min.z),
            ]
        })
    }
}

/// A triangle mesh in world space, ready for `PhysicsWorld::create_static_mesh_shape`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MergedCollisionMesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<[u32; 3]>,
}

impl MergedCollisionMesh {
    /// Merges boxes into one mesh.
    ///
    /// # Arguments
    /// * `chunk_position` - The chunk being merged, for error reporting
    /// * `boxes` - The boxes to merge
    ///
    /// # Returns
    /// A mesh of `8 * boxes.len()` vertices and `12 * boxes.len()` triangles, or
    /// `VoxelError::CollisionMerge` if there is nothing to merge or the vertex count
    /// overflows 32-bit indices.
    pub fn merge(chunk_position: Point3<i32>, boxes: &[BoxVolume]) -> VoxelResult<Self> {
        let merge_error = |message: &str| VoxelError::CollisionMerge {
            x: chunk_position.x,
            y: chunk_position.y,
            z: chunk_position.z,
            message: message.to_string(),
        };

        if boxes.is_empty() {
            return Err(merge_error("no boxes to merge"));
        }

        let vertex_count = boxes
            .len()
            .checked_mul(BOX_CORNERS.len())
            .filter(|&count| u32::try_from(count).is_ok())
            .ok_or_else(|| merge_error("too many vertices for 32-bit indices"))?;

        let mut mesh = MergedCollisionMesh {
            vertices: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(boxes.len() * BOX_TRIANGLES.len()),
        };

        for volume in boxes {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend(volume.corners());
            mesh.indices.extend(
                BOX_TRIANGLES
                    .iter()
                    .map(|[a, b, c]| [base + a, base + b, base + c]),
            );
        }

        Ok(mesh)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}
