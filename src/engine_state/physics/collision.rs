//! # Chunk Collision Builder
//!
//! Rebuilds the static collision body of one chunk at a time. Rebuilds are driven by
//! `VoxelWorld::update`, which pulls chunks off this builder's work queue one by one and
//! yields between them so a large drain never stalls the frame loop.
//!
//! The queue lives here rather than in the drain future so that chunks not yet reached
//! by an abandoned drain are picked up by the next one.

use std::collections::{HashMap, VecDeque};

use cgmath::Point3;
use log::debug;

use crate::engine_state::voxels::{
    block::BlockCatalog, chunk::chunk_iteration::ChunkCellIterator, world::VoxelStore,
};
use crate::error::VoxelResult;

use super::{BodyHandle, BoxVolume, MergedCollisionMesh, PhysicsWorld, ShapeHandle};

/// Physics resources owned by one chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ChunkCollider {
    body: BodyHandle,
    shape: ShapeHandle,
}

/// Builds and owns the collision body of every chunk with solid voxels.
pub struct ChunkCollisionBuilder {
    physics: Box<dyn PhysicsWorld>,
    colliders: HashMap<Point3<i32>, ChunkCollider>,
    queue: VecDeque<Point3<i32>>,
}

impl ChunkCollisionBuilder {
    pub fn new(physics: Box<dyn PhysicsWorld>) -> Self {
        ChunkCollisionBuilder {
            physics,
            colliders: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Appends chunks to the work queue, skipping any already queued.
    pub fn enqueue(&mut self, chunks: impl IntoIterator<Item = Point3<i32>>) {
        for chunk in chunks {
            if !self.queue.contains(&chunk) {
                self.queue.push_back(chunk);
            }
        }
    }

    /// Pops the next chunk to rebuild.
    pub fn next_chunk(&mut self) -> Option<Point3<i32>> {
        self.queue.pop_front()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Replaces the collision body of one chunk.
    ///
    /// The old body is removed from the physics world before its shape is released.
    /// Then one box per solid voxel is merged into a single static mesh body. A chunk
    /// without solid voxels ends up with no body.
    ///
    /// # Returns
    /// `true` if the chunk now has a body. On error the chunk is left without one.
    pub fn rebuild_chunk(
        &mut self,
        chunk_position: Point3<i32>,
        store: &VoxelStore,
        catalog: &BlockCatalog,
        voxel_size: f32,
    ) -> VoxelResult<bool> {
        self.remove_chunk(chunk_position);

        let boxes: Vec<BoxVolume> = ChunkCellIterator::new(chunk_position)
            .filter(|(_, world)| store.is_solid(*world, catalog))
            .map(|(_, world)| BoxVolume::voxel(world, voxel_size))
            .collect();

        if boxes.is_empty() {
            debug!("Chunk {:?} has no solid voxels, no collider", chunk_position);
            return Ok(false);
        }

        let mesh = MergedCollisionMesh::merge(chunk_position, &boxes)?;
        drop(boxes);

        let shape = self.physics.create_static_mesh_shape(&mesh)?;
        let body = match self.physics.create_static_body(shape, Point3::new(0.0, 0.0, 0.0)) {
            Ok(body) => body,
            Err(e) => {
                self.physics.remove_shape(shape);
                return Err(e);
            }
        };

        debug!(
            "Chunk {:?} collider rebuilt: {} triangles",
            chunk_position,
            mesh.triangle_count()
        );
        self.colliders.insert(chunk_position, ChunkCollider { body, shape });
        Ok(true)
    }

    /// Removes the body and then the shape of a chunk, if it has them.
    pub fn remove_chunk(&mut self, chunk_position: Point3<i32>) {
        if let Some(collider) = self.colliders.remove(&chunk_position) {
            self.physics.remove_body(collider.body);
            self.physics.remove_shape(collider.shape);
        }
    }

    pub fn has_collider(&self, chunk_position: Point3<i32>) -> bool {
        self.colliders.contains_key(&chunk_position)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Removes every body and shape and forgets the work queue.
    pub fn dispose(&mut self) {
        let chunks: Vec<Point3<i32>> = self.colliders.keys().copied().collect();
        for chunk_position in chunks {
            self.remove_chunk(chunk_position);
        }
        self.queue.clear();
    }
}
