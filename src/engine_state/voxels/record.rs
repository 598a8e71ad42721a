//! # Voxel Records
//!
//! `VoxelRecord` is the in-memory form of one occupied cell. `WorldRecord` is the flat
//! form collaborators exchange (JSON, network messages), which may carry an `explode`
//! directive describing a whole rectangular prism of identical voxels.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

use crate::error::{VoxelError, VoxelResult};

use super::block::BlockTypeId;

/// One voxel: its cell, its block type and its rotation about the vertical axis.
///
/// Identity is the position; the store holds at most one record per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelRecord {
    pub position: Point3<i32>,
    pub block_type: BlockTypeId,
    pub rotation_degrees: i32,
}

impl VoxelRecord {
    /// Creates an unrotated voxel record.
    pub fn new(position: Point3<i32>, block_type: impl Into<BlockTypeId>) -> Self {
        VoxelRecord {
            position,
            block_type: block_type.into(),
            rotation_degrees: 0,
        }
    }

    /// Returns the record rotated by `degrees` about the Y axis.
    pub fn with_rotation(mut self, degrees: i32) -> Self {
        self.rotation_degrees = degrees;
        self
    }
}

/// Serialisable world record: `{ position, typeId, rotation, explode? }`.
///
/// `explode` extends the record into the prism spanning `position` to
/// `position + explode`, inclusive at both ends on every axis.
///
/// # Examples
///
/// ```
/// use voxel_chunk_core::WorldRecord;
///
/// let record = WorldRecord {
///     position: [8, 0, 8],
///     type_id: "grass".into(),
///     rotation: 0,
///     explode: Some([3, 0, 3]),
/// };
/// assert_eq!(record.expand().len(), 16);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRecord {
    pub position: [i32; 3],
    pub type_id: BlockTypeId,
    #[serde(default)]
    pub rotation: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explode: Option<[i32; 3]>,
}

impl WorldRecord {
    /// Expands the record into individual voxel records.
    ///
    /// Without an `explode` directive this is a single record. Negative extents grow the
    /// prism towards negative coordinates.
    pub fn expand(&self) -> Vec<VoxelRecord> {
        let [x, y, z] = self.position;
        let [ex, ey, ez] = self.explode.unwrap_or([0, 0, 0]);

        let span = |start: i32, extent: i32| start.min(start + extent)..=start.max(start + extent);

        let mut records = Vec::new();
        for cz in span(z, ez) {
            for cy in span(y, ey) {
                for cx in span(x, ex) {
                    records.push(
                        VoxelRecord::new(Point3::new(cx, cy, cz), self.type_id.clone())
                            .with_rotation(self.rotation),
                    );
                }
            }
        }
        records
    }
}

/// Parses a JSON array of world records.
pub fn parse_world_records(json: &str) -> VoxelResult<Vec<WorldRecord>> {
    serde_json::from_str(json).map_err(|source| VoxelError::Parse {
        what: "world records",
        source,
    })
}
