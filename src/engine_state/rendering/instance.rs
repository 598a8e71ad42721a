use cgmath::{Matrix4, Rad, Vector3};

use crate::engine_state::voxels::{block::BlockDefinition, record::VoxelRecord};

/// Per-instance transform of one voxel in a batch.
///
/// Rotation is about the Y axis only. The transform applies scale, then rotation,
/// then translation.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    pub translation: [f32; 3],
    /// Radians
    pub rotation_y: f32,
    pub scale: [f32; 3],
}

impl InstanceTransform {
    /// Places a voxel: its cell scaled by `voxel_size`, shifted by the block's offset,
    /// rotated by the record's rotation and scaled by the block's scale.
    pub fn for_voxel(record: &VoxelRecord, definition: &BlockDefinition, voxel_size: f32) -> Self {
        let offset = definition.offset();
        InstanceTransform {
            translation: [
                record.position.x as f32 * voxel_size + offset[0],
                record.position.y as f32 * voxel_size + offset[1],
                record.position.z as f32 * voxel_size + offset[2],
            ],
            rotation_y: (record.rotation_degrees as f32).to_radians(),
            scale: definition.scale(),
        }
    }

    /// Column-major model matrix.
    pub fn to_matrix(&self) -> [[f32; 4]; 4] {
        let matrix = Matrix4::from_translation(Vector3::from(self.translation))
            * Matrix4::from_angle_y(Rad(self.rotation_y))
            * Matrix4::from_nonuniform_scale(self.scale[0], self.scale[1], self.scale[2]);
        matrix.into()
    }
}
