//! # Engine State Module
//!
//! The voxel world facade and the subsystems behind it.
//!
//! ## Key Components
//!
//! * `VoxelWorld` - The public handle: block edits, bulk loads, `update()`, `dispose()`
//! * `voxels` - Voxel store, block catalog, chunk math and dirty tracking
//! * `rendering` - Instance batches, auto-tiling and the shared resource cache
//! * `physics` - Per-chunk static collision bodies
//! * `task_management` - Cooperative yield and the single-flight gate
//!
//! ## Architecture
//!
//! All mutable state lives in one `WorldState` behind an `StResource`. Every public
//! method takes `&self` and borrows that state only for as long as one synchronous step
//! runs. This is what lets a caller keep editing blocks, or call `update()` again, while
//! a collision drain started by an earlier `update()` is suspended at a yield point.
//!
//! ## Update cycle
//!
//! 1. Await any catalog texture not yet loaded
//! 2. Rebuild every visually dirty chunk, synchronously
//! 3. Drain the collision queue one chunk at a time, yielding between chunks
//!
//! Only one collision drain runs at a time. An `update()` that finds one in flight waits
//! for it to finish and returns without starting another; chunks dirtied meanwhile stay
//! queued for the next `update()`.

use std::rc::Rc;

use cgmath::Point3;
use futures::future::join_all;
use log::{debug, error, info};
use web_time::Instant;

pub mod physics;
pub mod rendering;
pub mod task_management;
pub mod voxels;

use crate::{config::WorldConfig, core::StResource};

use physics::{ChunkCollisionBuilder, PhysicsWorld};
use rendering::{
    meshing::{ChunkMeshBuilder, ChunkRenderSummary, MeshingContext},
    resource_cache::ResourceCache,
    Scene, TextureLoader,
};
use task_management::{yield_now, SingleFlight};
use voxels::{
    block::BlockCatalog,
    chunk::chunk_position_of,
    dirty::DirtyTracker,
    record::{VoxelRecord, WorldRecord},
    world::VoxelStore,
};

/// Counters describing the current state of a world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Occupied cells
    pub voxels: usize,
    /// Chunks that currently own a scene group
    pub rendered_chunks: usize,
    /// Chunks that currently own a collision body
    pub collision_chunks: usize,
    /// Base geometries held by the resource cache, the placeholder included
    pub geometries: usize,
    /// Materials held by the resource cache, the fallback included
    pub materials: usize,
    /// Visually dirty chunks awaiting the next `update()`
    pub pending_visual: usize,
    /// Collision-dirty chunks not yet taken by a drain, plus those queued by one
    pub pending_collision: usize,
}

/// Mutable state shared by every handle of one world.
struct WorldState {
    config: WorldConfig,
    catalog: BlockCatalog,
    store: VoxelStore,
    dirty: DirtyTracker,
    meshes: ChunkMeshBuilder,
    resources: ResourceCache,
    scene: Box<dyn Scene>,
    collision: Option<ChunkCollisionBuilder>,
}

/// Builder for `VoxelWorld`.
pub struct VoxelWorldBuilder {
    config: WorldConfig,
    catalog: BlockCatalog,
    scene: Box<dyn Scene>,
    loader: Rc<dyn TextureLoader>,
    physics: Option<Box<dyn PhysicsWorld>>,
}

impl VoxelWorldBuilder {
    pub fn config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    /// Supplies the physics world collision bodies are built into.
    ///
    /// Without one, or with `collision_enabled` off, no collision work is tracked.
    pub fn physics(mut self, physics: Box<dyn PhysicsWorld>) -> Self {
        self.physics = Some(physics);
        self
    }

    pub fn build(self) -> VoxelWorld {
        let collision = if self.config.collision_enabled {
            self.physics.map(ChunkCollisionBuilder::new)
        } else {
            None
        };

        let state = WorldState {
            dirty: DirtyTracker::new(collision.is_some()),
            resources: ResourceCache::new(self.config.voxel_size, self.config.fallback_color),
            meshes: ChunkMeshBuilder::new(),
            store: VoxelStore::new(),
            catalog: self.catalog,
            config: self.config,
            scene: self.scene,
            collision,
        };

        VoxelWorld {
            state: StResource::new(state),
            loader: self.loader,
            collision_flight: SingleFlight::new(),
        }
    }
}

/// A sparse voxel world, rendered and collided per 16³ chunk.
///
/// Cloning a `VoxelWorld` yields another handle on the same world.
#[derive(Clone)]
pub struct VoxelWorld {
    state: StResource<WorldState>,
    loader: Rc<dyn TextureLoader>,
    collision_flight: SingleFlight,
}

impl VoxelWorld {
    /// Starts building a world.
    ///
    /// # Arguments
    /// * `catalog` - Block definitions, read-only for the life of the world
    /// * `scene` - Rendering engine batches are built into
    /// * `loader` - Resolves the catalog's texture paths
    pub fn builder(
        catalog: BlockCatalog,
        scene: Box<dyn Scene>,
        loader: Rc<dyn TextureLoader>,
    ) -> VoxelWorldBuilder {
        VoxelWorldBuilder {
            config: WorldConfig::default(),
            catalog,
            scene,
            loader,
            physics: None,
        }
    }

    /// Places a voxel, replacing whatever occupied its cell.
    ///
    /// The change becomes visible on the next `update()`.
    pub fn add_block(&self, record: VoxelRecord) {
        let mut state = self.state.get_mut();
        let position = record.position;
        state.store.insert(record);
        state.dirty.mark_voxel_changed(position);
    }

    /// Clears a cell.
    ///
    /// # Returns
    /// The removed record. Removing an empty cell returns `None` and marks nothing dirty.
    pub fn remove_block(&self, position: Point3<i32>) -> Option<VoxelRecord> {
        let mut state = self.state.get_mut();
        let removed = state.store.remove(position);
        if removed.is_some() {
            state.dirty.mark_voxel_changed(position);
        }
        removed
    }

    /// Returns a copy of the record at a cell.
    pub fn get_voxel(&self, position: Point3<i32>) -> Option<VoxelRecord> {
        self.state.get().store.get(position).cloned()
    }

    /// Returns `true` if the cell holds a block whose type is known and solid.
    pub fn is_solid(&self, position: Point3<i32>) -> bool {
        let state = self.state.get();
        state.store.is_solid(position, &state.catalog)
    }

    /// Replaces the whole world with `records`.
    ///
    /// Records with `explode` fill their inclusive box. Every chunk that held voxels
    /// before, and every chunk touched by the new voxels, is marked dirty. Catalog
    /// textures are loaded before this resolves; chunks are rebuilt by the next
    /// `update()`.
    pub async fn load_initial_world(&self, records: Vec<WorldRecord>) {
        {
            let mut guard = self.state.get_mut();
            let state = &mut *guard;

            for previous in state.store.drain() {
                state.dirty.mark_chunk(chunk_position_of(previous.position));
            }

            let mut loaded = 0;
            for record in &records {
                for voxel in record.expand() {
                    let position = voxel.position;
                    state.store.insert(voxel);
                    state.dirty.mark_voxel_changed(position);
                    loaded += 1;
                }
            }

            info!(
                "Loaded {} voxels from {} records, {} chunks dirty",
                loaded,
                records.len(),
                state.dirty.pending_visual()
            );
        }

        self.load_textures().await;
    }

    /// Brings visuals and collision in line with the voxel store.
    ///
    /// Visual rebuilds complete before this yields for the first time. Collision
    /// rebuilds run one chunk per poll. No per-chunk error escapes: failures are logged
    /// and the chunk is left without the failed resource until it is dirtied again.
    pub async fn update(&self) {
        self.load_textures().await;
        self.rebuild_visuals();
        self.drain_collisions().await;
    }

    /// Releases every scene and physics resource the world holds.
    ///
    /// Voxel data and dirty marks are kept, so every chunk is rebuilt if the world is
    /// updated again.
    pub fn dispose(&self) {
        let mut guard = self.state.get_mut();
        let state = &mut *guard;

        state.meshes.dispose(state.scene.as_mut());
        if let Some(collision) = state.collision.as_mut() {
            collision.dispose();
        }
        state.resources.dispose(state.scene.as_mut());

        let chunks: Vec<Point3<i32>> = state
            .store
            .iter()
            .map(|record| chunk_position_of(record.position))
            .collect();
        for chunk in chunks {
            state.dirty.mark_chunk(chunk);
        }
        info!("World disposed");
    }

    pub fn stats(&self) -> WorldStats {
        let state = self.state.get();
        WorldStats {
            voxels: state.store.len(),
            rendered_chunks: state.meshes.chunk_count(),
            collision_chunks: state
                .collision
                .as_ref()
                .map_or(0, ChunkCollisionBuilder::collider_count),
            geometries: state.resources.geometry_count(),
            materials: state.resources.material_count(),
            pending_visual: state.dirty.pending_visual(),
            pending_collision: state.dirty.pending_collision()
                + state
                    .collision
                    .as_ref()
                    .map_or(0, ChunkCollisionBuilder::queued),
        }
    }

    /// Returns the batches currently drawn for a chunk, or `None` if it has no group.
    pub fn rendered_chunk(&self, chunk: Point3<i32>) -> Option<ChunkRenderSummary> {
        self.state.get().meshes.summary(chunk)
    }

    /// Returns `true` if the chunk currently owns a collision body.
    pub fn has_collision(&self, chunk: Point3<i32>) -> bool {
        self.state
            .get()
            .collision
            .as_ref()
            .is_some_and(|collision| collision.has_collider(chunk))
    }

    /// Awaits every catalog texture that has neither loaded nor failed yet.
    ///
    /// Loads already started by a concurrent caller are awaited, not requested again.
    async fn load_textures(&self) {
        let loads = {
            let mut guard = self.state.get_mut();
            let state = &mut *guard;
            state
                .resources
                .texture_loads(&state.catalog, self.loader.as_ref())
        };
        if loads.is_empty() {
            return;
        }

        debug!("Awaiting {} textures", loads.len());
        let results = join_all(loads.iter().map(|(_, load)| load.clone())).await;

        let mut state = self.state.get_mut();
        for ((path, _), result) in loads.iter().zip(results) {
            state.resources.finish_texture(path, result);
        }
    }

    fn rebuild_visuals(&self) {
        let mut guard = self.state.get_mut();
        let state = &mut *guard;

        let chunks = state.dirty.visual_chunks();
        if chunks.is_empty() {
            return;
        }

        let started = Instant::now();
        let mut context = MeshingContext {
            store: &state.store,
            catalog: &state.catalog,
            resources: &mut state.resources,
            scene: state.scene.as_mut(),
            voxel_size: state.config.voxel_size,
        };

        let mut instances = 0;
        for chunk in &chunks {
            instances += state.meshes.rebuild_chunk(*chunk, &mut context);
            state.dirty.clear_visual(*chunk);
        }

        debug!(
            "Rebuilt visuals of {} chunks ({} instances) in {:?}",
            chunks.len(),
            instances,
            started.elapsed()
        );
    }

    async fn drain_collisions(&self) {
        let Some(_pass) = self.collision_flight.try_begin() else {
            debug!("Collision drain already in flight, waiting for it");
            self.collision_flight.wait_idle().await;
            return;
        };

        {
            let mut guard = self.state.get_mut();
            let state = &mut *guard;
            let Some(collision) = state.collision.as_mut() else {
                return;
            };
            collision.enqueue(state.dirty.take_collision_queue());
            if collision.queued() == 0 {
                return;
            }
        }

        let started = Instant::now();
        let mut rebuilt = 0;
        loop {
            {
                let mut guard = self.state.get_mut();
                let state = &mut *guard;
                let Some(collision) = state.collision.as_mut() else {
                    break;
                };
                let Some(chunk) = collision.next_chunk() else {
                    break;
                };

                let voxel_size = state.config.voxel_size;
                if let Err(e) =
                    collision.rebuild_chunk(chunk, &state.store, &state.catalog, voxel_size)
                {
                    error!("Chunk {:?} left without collision: {}", chunk, e);
                }
                rebuilt += 1;
            }

            yield_now().await;
        }

        debug!(
            "Collision drain rebuilt {} chunks in {:?}",
            rebuilt,
            started.elapsed()
        );
    }
}
