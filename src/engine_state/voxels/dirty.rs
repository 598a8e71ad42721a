//! # Dirty Tracker
//!
//! Two independent sets of chunk coordinates: chunks whose visual resources are stale
//! and chunks whose collision resources are stale. They are kept apart because
//! collision rebuilds are more expensive and are drained on a different cadence.

use std::collections::{HashSet, VecDeque};

use cgmath::Point3;

use super::chunk::{chunk_position_of, chunks_affected_by};

/// Tracks which chunks need their visual or collision resources rebuilt.
#[derive(Debug, Default)]
pub struct DirtyTracker {
    visual: HashSet<Point3<i32>>,
    collision: HashSet<Point3<i32>>,
    /// When `false`, collision marks are dropped (no physics world to rebuild into).
    track_collision: bool,
}

impl DirtyTracker {
    /// Creates a tracker. `track_collision` should be `true` only when a physics world
    /// exists to receive collision rebuilds.
    pub fn new(track_collision: bool) -> Self {
        DirtyTracker {
            visual: HashSet::new(),
            collision: HashSet::new(),
            track_collision,
        }
    }

    /// Records that the voxel at a world cell changed.
    ///
    /// The owning chunk is marked for both visual and collision rebuild. Neighbouring
    /// chunks that read this cell across a boundary (culling, auto-tiling) are marked for
    /// visual rebuild only: collision geometry of a chunk covers its own voxels alone.
    pub fn mark_voxel_changed(&mut self, world: Point3<i32>) {
        let owner = chunk_position_of(world);
        self.mark_collision(owner);
        for chunk in chunks_affected_by(world) {
            self.visual.insert(chunk);
        }
    }

    /// Marks a whole chunk stale for both visual and collision rebuild.
    pub fn mark_chunk(&mut self, chunk: Point3<i32>) {
        self.visual.insert(chunk);
        self.mark_collision(chunk);
    }

    fn mark_collision(&mut self, chunk: Point3<i32>) {
        if self.track_collision {
            self.collision.insert(chunk);
        }
    }

    /// Snapshot of the visually dirty chunks, in hash order.
    pub fn visual_chunks(&self) -> Vec<Point3<i32>> {
        self.visual.iter().copied().collect()
    }

    /// Clears the visual-dirty flag of one chunk.
    pub fn clear_visual(&mut self, chunk: Point3<i32>) {
        self.visual.remove(&chunk);
    }

    /// Moves every collision-dirty chunk into a work queue, leaving the set empty.
    ///
    /// Chunks marked after this call accumulate in the set for the next pass.
    pub fn take_collision_queue(&mut self) -> VecDeque<Point3<i32>> {
        self.collision.drain().collect()
    }

    /// Returns `true` if the chunk awaits a visual rebuild.
    pub fn is_visual_dirty(&self, chunk: Point3<i32>) -> bool {
        self.visual.contains(&chunk)
    }

    /// Returns `true` if the chunk awaits a collision rebuild.
    pub fn is_collision_dirty(&self, chunk: Point3<i32>) -> bool {
        self.collision.contains(&chunk)
    }

    /// Number of chunks awaiting a visual rebuild.
    pub fn pending_visual(&self) -> usize {
        self.visual.len()
    }

    /// Number of chunks awaiting a collision rebuild.
    pub fn pending_collision(&self) -> usize {
        self.collision.len()
    }
}
