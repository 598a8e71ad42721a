//! # Chunk Iteration Module
//!
//! This module provides an iterator over every cell of a chunk, yielding both the
//! chunk-local coordinate and the matching world coordinate. Both the mesh builder and
//! the collision builder walk chunks with it, so they agree on the cell range.

use cgmath::Point3;

use super::{world_position_of, CHUNK_DIMENSION};

/// An iterator over all `CHUNK_DIMENSION³` cells of a chunk.
///
/// Cells are visited x fastest, then y, then z.
pub struct ChunkCellIterator {
    /// The chunk being walked
    chunk_position: Point3<i32>,
    /// Current X position within the chunk
    local_x: i32,
    /// Current Y position within the chunk
    local_y: i32,
    /// Current Z position within the chunk
    local_z: i32,
}

impl ChunkCellIterator {
    /// Creates a new `ChunkCellIterator` positioned at local cell (0,0,0).
    pub fn new(chunk_position: Point3<i32>) -> Self {
        ChunkCellIterator {
            chunk_position,
            local_x: 0,
            local_y: 0,
            local_z: 0,
        }
    }
}

impl Iterator for ChunkCellIterator {
    /// `(local, world)` coordinates of the next cell.
    type Item = (Point3<usize>, Point3<i32>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.local_z == CHUNK_DIMENSION {
            return None;
        }

        let local = Point3::new(self.local_x, self.local_y, self.local_z);
        let world = world_position_of(self.chunk_position, local);

        // Advance, carrying into the next row and plane
        self.local_x += 1;
        if self.local_x == CHUNK_DIMENSION {
            self.local_x = 0;
            self.local_y += 1;

            if self.local_y == CHUNK_DIMENSION {
                self.local_y = 0;
                self.local_z += 1;
            }
        }

        let local = Point3::new(local.x as usize, local.y as usize, local.z as usize);
        Some((local, world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::CHUNK_SIZE;

    #[test]
    fn visits_every_cell_once_in_x_major_order() {
        let cells: Vec<_> = ChunkCellIterator::new(Point3::new(-1, 0, 2)).collect();

        assert_eq!(cells.len(), CHUNK_SIZE as usize);
        assert_eq!(cells[0], (Point3::new(0, 0, 0), Point3::new(-16, 0, 32)));
        assert_eq!(cells[1].0, Point3::new(1, 0, 0));
        assert_eq!(cells[16].0, Point3::new(0, 1, 0));
        assert_eq!(
            cells.last().copied(),
            Some((Point3::new(15, 15, 15), Point3::new(-1, 15, 47)))
        );
    }
}
