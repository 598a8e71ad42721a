//! # Chunk Module
//!
//! Chunks are fixed 16x16x16 groupings of voxel cells. They own no voxel data of their
//! own: the voxel store is the single source of truth, and a chunk coordinate is only a
//! key for dirty tracking and for the render/collision resources built per chunk.
//!
//! ## Solidity snapshot
//!
//! `ChunkOccupancy` captures which cells of a chunk are solid, plus a one-cell border
//! taken from the neighbouring chunks, in a single bit vector:
//! - `solid_array`: 1 bit per cell of the wrapped 18x18x18 volume
//!
//! The border is what lets face culling answer "are all six neighbours solid?" for a
//! voxel on the chunk boundary without another store lookup per face.
//!
//! ### Performance Characteristics
//! - **Snapshot**: one store lookup per wrapped cell (18³ = 5832)
//! - **Solidity Check**: O(1), a single bit test
//! - **Memory Usage**: ~730 bytes per snapshot

use bitvec::prelude::BitVec;
use cgmath::Point3;

use super::block::block_side::BlockSide;
use super::block::BlockCatalog;
use super::world::VoxelStore;

pub mod chunk_iteration;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;
/// The dimension of a chunk including an extra layer of blocks on each side for neighbor lookups.
pub const CHUNK_DIMENSION_WRAPPED: usize = (CHUNK_DIMENSION + 2) as usize;
/// The number of blocks in a wrapped 2D chunk plane.
pub const CHUNK_PLANE_SIZE_WRAPPED: usize = CHUNK_DIMENSION_WRAPPED * CHUNK_DIMENSION_WRAPPED;
/// The total number of blocks in a wrapped chunk.
pub const CHUNK_SIZE_WRAPPED: usize = CHUNK_PLANE_SIZE_WRAPPED * CHUNK_DIMENSION_WRAPPED;

/// Returns the chunk coordinate owning a world cell: `floor(world / 16)` per axis.
pub fn chunk_position_of(world: Point3<i32>) -> Point3<i32> {
    Point3::new(
        world.x.div_euclid(CHUNK_DIMENSION),
        world.y.div_euclid(CHUNK_DIMENSION),
        world.z.div_euclid(CHUNK_DIMENSION),
    )
}

/// Returns the cell's coordinate inside its chunk, each axis in `0..16`.
pub fn local_position_of(world: Point3<i32>) -> Point3<i32> {
    Point3::new(
        world.x.rem_euclid(CHUNK_DIMENSION),
        world.y.rem_euclid(CHUNK_DIMENSION),
        world.z.rem_euclid(CHUNK_DIMENSION),
    )
}

/// Returns the world coordinate of a chunk-local cell.
pub fn world_position_of(chunk: Point3<i32>, local: Point3<i32>) -> Point3<i32> {
    Point3::new(
        chunk.x * CHUNK_DIMENSION + local.x,
        chunk.y * CHUNK_DIMENSION + local.y,
        chunk.z * CHUNK_DIMENSION + local.z,
    )
}

/// Returns every chunk whose derived resources can depend on the given cell.
///
/// That is the owning chunk plus, for each axis where the cell sits on a boundary plane
/// (local coordinate 0 or 15), the chunk across that plane. Cells on an edge or corner
/// also return the diagonal chunks, since auto-tiling reads diagonal neighbours.
/// The owning chunk is always first.
pub fn chunks_affected_by(world: Point3<i32>) -> Vec<Point3<i32>> {
    let chunk = chunk_position_of(world);
    let local = local_position_of(world);

    let axis_steps = |coordinate: i32| -> Vec<i32> {
        let mut steps = vec![0];
        if coordinate == 0 {
            steps.push(-1);
        }
        if coordinate == CHUNK_DIMENSION - 1 {
            steps.push(1);
        }
        steps
    };

    let mut affected = Vec::with_capacity(8);
    for dz in axis_steps(local.z) {
        for dy in axis_steps(local.y) {
            for dx in axis_steps(local.x) {
                affected.push(Point3::new(chunk.x + dx, chunk.y + dy, chunk.z + dz));
            }
        }
    }
    affected
}

/// Solidity snapshot of one chunk plus a one-cell border from its neighbours.
///
/// Coordinates passed to the `is_block_solid` family are wrapped coordinates
/// (`0..CHUNK_DIMENSION_WRAPPED`); chunk-local cell `(x, y, z)` lives at
/// `(x + 1, y + 1, z + 1)`.
pub struct ChunkOccupancy {
    /// The chunk coordinate this snapshot was taken for.
    pub position: Point3<i32>,

    /// One bit per wrapped cell, x fastest, then y, then z.
    pub solid_array: BitVec,

    /// Number of solid cells inside the chunk proper (border excluded).
    pub solid_count: usize,
}

impl ChunkOccupancy {
    /// Samples the store for the chunk at `position` and its one-cell border.
    ///
    /// Cells referencing unknown block types count as empty.
    pub fn snapshot(position: Point3<i32>, store: &VoxelStore, catalog: &BlockCatalog) -> Self {
        let mut solid_array = BitVec::with_capacity(CHUNK_SIZE_WRAPPED);
        let mut solid_count = 0;
        let origin = world_position_of(position, Point3::new(-1, -1, -1));

        for k in 0..CHUNK_DIMENSION_WRAPPED {
            for j in 0..CHUNK_DIMENSION_WRAPPED {
                for i in 0..CHUNK_DIMENSION_WRAPPED {
                    let world = Point3::new(
                        origin.x + i as i32,
                        origin.y + j as i32,
                        origin.z + k as i32,
                    );
                    let is_solid = store.is_solid(world, catalog);
                    solid_array.push(is_solid);

                    if is_solid && Self::is_interior(i, j, k) {
                        solid_count += 1;
                    }
                }
            }
        }

        ChunkOccupancy {
            position,
            solid_array,
            solid_count,
        }
    }

    fn is_interior(i: usize, j: usize, k: usize) -> bool {
        let inside = 1..CHUNK_DIMENSION_WRAPPED - 1;
        inside.contains(&i) && inside.contains(&j) && inside.contains(&k)
    }

    /// Checks if the block at the specified wrapped coordinates is solid.
    pub fn is_block_solid(&self, cx: usize, cy: usize, cz: usize) -> bool {
        self.solid_array[cx + CHUNK_DIMENSION_WRAPPED * cy + CHUNK_PLANE_SIZE_WRAPPED * cz]
    }

    /// Checks if the chunk-local cell `(x, y, z)` is solid.
    pub fn is_local_solid(&self, x: usize, y: usize, z: usize) -> bool {
        self.is_block_solid(x + 1, y + 1, z + 1)
    }

    /// Determines which faces of the local cell at (x,y,z) touch a solid neighbour.
    ///
    /// # Returns
    /// An array of 6 booleans in `BlockSide` order, `true` where the neighbour across
    /// that face is solid (and the face is therefore hidden).
    pub fn generate_adjacent_blocks(&self, x: usize, y: usize, z: usize) -> [bool; 6] {
        //This accounts for the chunk wrapping
        let i = x + 1;
        let j = y + 1;
        let k = z + 1;

        let mut adjacency_data = [false; 6];
        adjacency_data[BlockSide::FRONT as usize] = self.is_block_solid(i - 1, j, k);
        adjacency_data[BlockSide::BACK as usize] = self.is_block_solid(i + 1, j, k);
        adjacency_data[BlockSide::LEFT as usize] = self.is_block_solid(i, j, k - 1);
        adjacency_data[BlockSide::RIGHT as usize] = self.is_block_solid(i, j, k + 1);
        adjacency_data[BlockSide::TOP as usize] = self.is_block_solid(i, j + 1, k);
        adjacency_data[BlockSide::BOTTOM as usize] = self.is_block_solid(i, j - 1, k);
        adjacency_data
    }

    /// Returns `true` if the local cell is solid and all six neighbours are solid.
    pub fn is_enclosed(&self, x: usize, y: usize, z: usize) -> bool {
        self.is_local_solid(x, y, z)
            && self
                .generate_adjacent_blocks(x, y, z)
                .iter()
                .all(|&solid| solid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockDefinition;
    use crate::engine_state::voxels::record::VoxelRecord;

    fn catalog() -> BlockCatalog {
        let mut glass = BlockDefinition::solid("glass", "glass.png");
        glass.is_solid = false;
        BlockCatalog::from_definitions([BlockDefinition::solid("stone", "stone.png"), glass])
    }

    #[test]
    fn chunk_coordinates_floor_towards_negative_infinity() {
        assert_eq!(chunk_position_of(Point3::new(0, 15, 16)), Point3::new(0, 0, 1));
        assert_eq!(chunk_position_of(Point3::new(-1, -16, -17)), Point3::new(-1, -1, -2));
        assert_eq!(local_position_of(Point3::new(-1, -16, -17)), Point3::new(15, 0, 15));

        let world = Point3::new(-33, 7, 40);
        assert_eq!(
            world_position_of(chunk_position_of(world), local_position_of(world)),
            world
        );
    }

    #[test]
    fn interior_cell_affects_only_its_own_chunk() {
        assert_eq!(chunks_affected_by(Point3::new(5, 5, 5)), vec![Point3::new(0, 0, 0)]);
    }

    #[test]
    fn boundary_cells_affect_the_chunk_across_the_face() {
        let affected = chunks_affected_by(Point3::new(0, 5, 5));
        assert_eq!(affected, vec![Point3::new(0, 0, 0), Point3::new(-1, 0, 0)]);

        let affected = chunks_affected_by(Point3::new(5, 15, 5));
        assert_eq!(affected, vec![Point3::new(0, 0, 0), Point3::new(0, 1, 0)]);
    }

    #[test]
    fn corner_cells_affect_all_surrounding_chunks() {
        let affected = chunks_affected_by(Point3::new(15, 15, 15));
        assert_eq!(affected.len(), 8);
        assert_eq!(affected[0], Point3::new(0, 0, 0));
        assert!(affected.contains(&Point3::new(1, 1, 1)));
    }

    #[test]
    fn snapshot_reads_the_border_from_neighbouring_chunks() {
        let mut store = VoxelStore::new();
        store.insert(VoxelRecord::new(Point3::new(0, 0, 0), "stone"));
        store.insert(VoxelRecord::new(Point3::new(-1, 0, 0), "stone"));
        store.insert(VoxelRecord::new(Point3::new(1, 0, 0), "glass"));

        let occupancy = ChunkOccupancy::snapshot(Point3::new(0, 0, 0), &store, &catalog());

        assert_eq!(occupancy.solid_count, 1);
        assert!(occupancy.is_local_solid(0, 0, 0));
        assert!(!occupancy.is_local_solid(1, 0, 0));

        let adjacency = occupancy.generate_adjacent_blocks(0, 0, 0);
        assert!(adjacency[BlockSide::FRONT as usize]);
        assert!(!adjacency[BlockSide::BACK as usize]);
    }

    #[test]
    fn enclosed_requires_all_six_neighbours() {
        let mut store = VoxelStore::new();
        let centre = Point3::new(16, 16, 16);
        store.insert(VoxelRecord::new(centre, "stone"));
        for side in BlockSide::all() {
            store.insert(VoxelRecord::new(centre + side.normal(), "stone"));
        }

        let chunk = Point3::new(1, 1, 1);
        let occupancy = ChunkOccupancy::snapshot(chunk, &store, &catalog());
        assert!(occupancy.is_enclosed(0, 0, 0));

        store.remove(centre + BlockSide::TOP.normal());
        let occupancy = ChunkOccupancy::snapshot(chunk, &store, &catalog());
        assert!(!occupancy.is_enclosed(0, 0, 0));
    }
}
