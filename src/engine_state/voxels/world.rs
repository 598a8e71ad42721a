//! # Voxel Store
//!
//! This module provides `VoxelStore`, the sparse map from integer cell coordinates to
//! voxel records. It is the single source of truth for "what block occupies this cell".
//!
//! ## Architecture
//!
//! The store is sparse: only occupied cells have an entry and there is never an entry
//! for air. This keeps memory proportional to the number of placed blocks, so the world
//! has no fixed bounds.
//!
//! The store itself knows nothing about chunks or dirtiness; `VoxelWorld` pairs each
//! mutation with the matching dirty marks.

use std::collections::HashMap;

use cgmath::Point3;

use super::block::BlockCatalog;
use super::record::VoxelRecord;

/// Sparse voxel storage keyed by world cell.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_chunk_core::{VoxelRecord, VoxelStore};
///
/// let mut store = VoxelStore::new();
/// store.insert(VoxelRecord::new(Point3::new(0, 0, 0), "stone"));
///
/// assert!(store.get(Point3::new(0, 0, 0)).is_some());
/// assert!(store.remove(Point3::new(0, 0, 0)).is_some());
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct VoxelStore {
    voxels: HashMap<Point3<i32>, VoxelRecord>,
}

impl VoxelStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, overwriting whatever occupied its cell.
    ///
    /// # Returns
    /// The previous record at that cell, if any.
    pub fn insert(&mut self, record: VoxelRecord) -> Option<VoxelRecord> {
        self.voxels.insert(record.position, record)
    }

    /// Removes the record at a cell.
    pub fn remove(&mut self, position: Point3<i32>) -> Option<VoxelRecord> {
        self.voxels.remove(&position)
    }

    /// Returns the record at a cell, if occupied.
    pub fn get(&self, position: Point3<i32>) -> Option<&VoxelRecord> {
        self.voxels.get(&position)
    }

    /// Returns `true` if the cell is occupied by a known, solid block type.
    pub fn is_solid(&self, position: Point3<i32>, catalog: &BlockCatalog) -> bool {
        self.get(position)
            .is_some_and(|record| catalog.is_solid_type(record.block_type.as_str()))
    }

    /// Returns `true` if the cell holds a block of exactly the given type.
    pub fn is_type(&self, position: Point3<i32>, block_type: &str) -> bool {
        self.get(position)
            .is_some_and(|record| record.block_type.as_str() == block_type)
    }

    /// Removes every record, returning them.
    pub fn drain(&mut self) -> Vec<VoxelRecord> {
        self.voxels.drain().map(|(_, record)| record).collect()
    }

    /// Iterates over all records in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &VoxelRecord> {
        self.voxels.values()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockDefinition;

    #[test]
    fn inserting_into_an_occupied_cell_overwrites() {
        let mut store = VoxelStore::new();
        let cell = Point3::new(3, -4, 5);

        assert!(store.insert(VoxelRecord::new(cell, "stone")).is_none());
        let previous = store.insert(VoxelRecord::new(cell, "dirt").with_rotation(90));

        assert_eq!(previous.map(|record| record.block_type.to_string()), Some("stone".into()));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(cell).unwrap().rotation_degrees, 90);
    }

    #[test]
    fn occupancy_follows_the_latest_mutation() {
        let mut store = VoxelStore::new();
        let mut expected: HashMap<Point3<i32>, bool> = HashMap::new();
        let mut rng = fastrand::Rng::with_seed(7);

        for _ in 0..500 {
            let cell = Point3::new(rng.i32(-3..3), rng.i32(-3..3), rng.i32(-3..3));
            if rng.bool() {
                store.insert(VoxelRecord::new(cell, "stone"));
                expected.insert(cell, true);
            } else {
                store.remove(cell);
                expected.insert(cell, false);
            }
        }

        for (cell, occupied) in expected {
            assert_eq!(store.get(cell).is_some(), occupied, "cell {:?}", cell);
        }
    }

    #[test]
    fn unknown_and_non_solid_types_are_not_solid() {
        let mut water = BlockDefinition::solid("water", "water.png");
        water.is_solid = false;
        let catalog =
            BlockCatalog::from_definitions([BlockDefinition::solid("stone", "stone.png"), water]);

        let mut store = VoxelStore::new();
        store.insert(VoxelRecord::new(Point3::new(0, 0, 0), "stone"));
        store.insert(VoxelRecord::new(Point3::new(1, 0, 0), "water"));
        store.insert(VoxelRecord::new(Point3::new(2, 0, 0), "mystery"));

        assert!(store.is_solid(Point3::new(0, 0, 0), &catalog));
        assert!(!store.is_solid(Point3::new(1, 0, 0), &catalog));
        assert!(!store.is_solid(Point3::new(2, 0, 0), &catalog));
        assert!(!store.is_solid(Point3::new(3, 0, 0), &catalog));
    }
}
