//! Chunk mesh building for instanced voxel rendering.
//!
//! Each chunk is drawn as a set of instance batches under one scene group node. A batch
//! is every visible voxel of one block type (and, for auto-tiled blocks, one top tile
//! pattern), drawn as instances of a shared base cube from the `ResourceCache`.
//!
//! # Architecture
//! - `ChunkMeshBuilder`: Rebuilds and disposes per-chunk batches
//! - `ChunkRenderable`: The scene resources a chunk currently owns
//! - `mesh/`: The base cube geometry
//!
//! # Rebuild
//! A rebuild is a full replacement. The chunk's previous instances and group node are
//! disposed first, then the chunk is walked cell by cell:
//! 1. Empty cells and cells of unknown block types are skipped
//! 2. Solid voxels with all six neighbours solid are culled
//! 3. Auto-tiled voxels resolve their top tile pattern from same-type neighbours
//! 4. Voxels are grouped by `BatchKey` and instanced under a new group node
//!
//! A chunk with nothing visible ends up with no group node at all.

use std::collections::HashMap;

use cgmath::Point3;
use log::{debug, error, warn};

pub mod mesh;

use crate::engine_state::{
    rendering::{
        autotile::{resolve_pattern, Neighborhood},
        resource_cache::{BatchKey, ResourceCache},
        InstanceHandle, InstanceTransform, NodeHandle, Scene,
    },
    voxels::{
        block::BlockCatalog,
        chunk::{chunk_iteration::ChunkCellIterator, ChunkOccupancy},
        record::VoxelRecord,
        world::VoxelStore,
    },
};

/// Scene resources owned by one rendered chunk.
#[derive(Debug)]
pub struct ChunkRenderable {
    /// Group node all of the chunk's instances are parented to
    pub group: NodeHandle,
    /// Instances of each batch
    pub batches: HashMap<BatchKey, Vec<InstanceHandle>>,
}

impl ChunkRenderable {
    pub fn instance_count(&self) -> usize {
        self.batches.values().map(Vec::len).sum()
    }
}

/// Read-only view of a rendered chunk's batches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRenderSummary {
    /// Instance count per batch
    pub batches: HashMap<BatchKey, usize>,
}

impl ChunkRenderSummary {
    pub fn instance_count(&self) -> usize {
        self.batches.values().sum()
    }

    /// Instance count of one batch, zero if the chunk has no such batch.
    pub fn batch(&self, key: &BatchKey) -> usize {
        self.batches.get(key).copied().unwrap_or(0)
    }
}

/// Everything a chunk rebuild reads from or writes into, besides the builder itself.
pub struct MeshingContext<'a> {
    pub store: &'a VoxelStore,
    pub catalog: &'a BlockCatalog,
    pub resources: &'a mut ResourceCache,
    pub scene: &'a mut dyn Scene,
    pub voxel_size: f32,
}

/// Builds and owns the instance batches of every rendered chunk.
#[derive(Debug, Default)]
pub struct ChunkMeshBuilder {
    chunks: HashMap<Point3<i32>, ChunkRenderable>,
}

impl ChunkMeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups the visible voxels of a chunk into batches.
    ///
    /// # Arguments
    /// * `chunk_position` - The chunk to walk
    /// * `store` - Voxel store, read across chunk boundaries for culling and auto-tiling
    /// * `catalog` - Block definitions
    ///
    /// # Returns
    /// The voxel records of each batch. Empty if nothing in the chunk is visible.
    pub fn collect_batches(
        chunk_position: Point3<i32>,
        store: &VoxelStore,
        catalog: &BlockCatalog,
    ) -> HashMap<BatchKey, Vec<VoxelRecord>> {
        let occupancy = ChunkOccupancy::snapshot(chunk_position, store, catalog);
        let mut batches: HashMap<BatchKey, Vec<VoxelRecord>> = HashMap::new();

        for (local, world) in ChunkCellIterator::new(chunk_position) {
            let Some(record) = store.get(world) else {
                continue;
            };

            let definition = match catalog.require(record.block_type.as_str()) {
                Ok(definition) => definition,
                Err(e) => {
                    warn!("Skipping voxel at {:?}: {}", world, e);
                    continue;
                }
            };

            if definition.is_solid && occupancy.is_enclosed(local.x, local.y, local.z) {
                continue;
            }

            let pattern = definition.auto_tile.as_ref().map(|_| {
                resolve_pattern(&Neighborhood::sample(
                    store,
                    world,
                    record.block_type.as_str(),
                ))
            });

            batches
                .entry(BatchKey {
                    block_type: record.block_type.clone(),
                    pattern,
                })
                .or_default()
                .push(record.clone());
        }

        batches
    }

    /// Replaces the visual resources of one chunk with a fresh build.
    ///
    /// Per-batch failures (geometry, instances) are logged and skipped; the rest of the
    /// chunk is still built.
    ///
    /// # Returns
    /// The number of instances now drawn for the chunk.
    pub fn rebuild_chunk(
        &mut self,
        chunk_position: Point3<i32>,
        context: &mut MeshingContext,
    ) -> usize {
        self.discard_chunk(chunk_position, context.scene);

        let batches = Self::collect_batches(chunk_position, context.store, context.catalog);
        if batches.is_empty() {
            debug!("Chunk {:?} has nothing visible", chunk_position);
            return 0;
        }

        let group = match context.scene.create_group(&format!(
            "chunk_{}_{}_{}",
            chunk_position.x, chunk_position.y, chunk_position.z
        )) {
            Ok(group) => group,
            Err(e) => {
                error!("Chunk {:?} left without visuals: {}", chunk_position, e);
                return 0;
            }
        };

        let mut renderable = ChunkRenderable {
            group,
            batches: HashMap::new(),
        };

        for (key, records) in batches {
            // Keys only come from voxels whose definition resolved above
            let Some(definition) = context.catalog.get(key.block_type.as_str()) else {
                continue;
            };

            let geometry = match context
                .resources
                .get_or_create_base_geometry(context.scene, &key, definition)
            {
                Ok(geometry) => geometry,
                Err(e) => {
                    error!(
                        "Skipping batch '{}' in chunk {:?}: {}",
                        key.geometry_name(),
                        chunk_position,
                        e
                    );
                    continue;
                }
            };

            let mut instances = Vec::with_capacity(records.len());
            for record in &records {
                let transform =
                    InstanceTransform::for_voxel(record, definition, context.voxel_size);
                match context.scene.create_instance(geometry, &transform, group) {
                    Ok(instance) => instances.push(instance),
                    Err(e) => warn!("Dropping voxel at {:?}: {}", record.position, e),
                }
            }

            if !instances.is_empty() {
                renderable.batches.insert(key, instances);
            }
        }

        let instance_count = renderable.instance_count();
        debug!(
            "Chunk {:?} rebuilt: {} batches, {} instances",
            chunk_position,
            renderable.batches.len(),
            instance_count
        );
        self.chunks.insert(chunk_position, renderable);
        instance_count
    }

    /// Disposes every instance and the group node of a chunk, if it has any.
    pub fn discard_chunk(&mut self, chunk_position: Point3<i32>, scene: &mut dyn Scene) {
        let Some(renderable) = self.chunks.remove(&chunk_position) else {
            return;
        };

        for instance in renderable.batches.into_values().flatten() {
            scene.dispose_instance(instance);
        }
        scene.dispose_node(renderable.group);
    }

    /// Returns the batches currently drawn for a chunk.
    pub fn summary(&self, chunk_position: Point3<i32>) -> Option<ChunkRenderSummary> {
        self.chunks.get(&chunk_position).map(|renderable| ChunkRenderSummary {
            batches: renderable
                .batches
                .iter()
                .map(|(key, instances)| (key.clone(), instances.len()))
                .collect(),
        })
    }

    /// Number of chunks that currently own a group node.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Disposes the visual resources of every chunk.
    pub fn dispose(&mut self, scene: &mut dyn Scene) {
        let chunks: Vec<Point3<i32>> = self.chunks.keys().copied().collect();
        for chunk_position in chunks {
            self.discard_chunk(chunk_position, scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{AutoTileConfig, BlockDefinition};

    fn catalog() -> BlockCatalog {
        let mut grass = BlockDefinition::solid("grass", "grass.png");
        grass.auto_tile = Some(AutoTileConfig {
            atlas_texture_id: "grass_atlas.png".into(),
            atlas_columns: 4,
            atlas_rows: 5,
        });
        BlockCatalog::from_definitions([BlockDefinition::solid("stone", "stone.png"), grass])
    }

    fn fill_cube(store: &mut VoxelStore, size: i32, block_type: &str) {
        for x in 0..size {
            for y in 0..size {
                for z in 0..size {
                    store.insert(VoxelRecord::new(Point3::new(x, y, z), block_type));
                }
            }
        }
    }

    #[test]
    fn enclosed_voxels_are_culled() {
        let catalog = catalog();
        let mut store = VoxelStore::new();
        fill_cube(&mut store, 3, "stone");

        let batches = ChunkMeshBuilder::collect_batches(Point3::new(0, 0, 0), &store, &catalog);
        let stone = &batches[&BatchKey::new("stone", None)];
        assert_eq!(stone.len(), 26);
        assert!(stone.iter().all(|record| record.position != Point3::new(1, 1, 1)));
    }

    #[test]
    fn removing_a_neighbour_uncovers_the_center() {
        let catalog = catalog();
        let mut store = VoxelStore::new();
        fill_cube(&mut store, 3, "stone");
        store.remove(Point3::new(1, 2, 1));

        let batches = ChunkMeshBuilder::collect_batches(Point3::new(0, 0, 0), &store, &catalog);
        let stone = &batches[&BatchKey::new("stone", None)];
        assert!(stone.iter().any(|record| record.position == Point3::new(1, 1, 1)));
    }

    #[test]
    fn unknown_types_are_skipped() {
        let catalog = catalog();
        let mut store = VoxelStore::new();
        store.insert(VoxelRecord::new(Point3::new(0, 0, 0), "mystery"));
        store.insert(VoxelRecord::new(Point3::new(1, 0, 0), "stone"));

        let batches = ChunkMeshBuilder::collect_batches(Point3::new(0, 0, 0), &store, &catalog);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[&BatchKey::new("stone", None)].len(), 1);
    }

    #[test]
    fn auto_tiled_voxels_split_by_pattern() {
        let catalog = catalog();
        let mut store = VoxelStore::new();
        store.insert(VoxelRecord::new(Point3::new(0, 0, 0), "grass"));
        store.insert(VoxelRecord::new(Point3::new(1, 0, 0), "grass"));
        store.insert(VoxelRecord::new(Point3::new(5, 0, 5), "grass"));

        let batches = ChunkMeshBuilder::collect_batches(Point3::new(0, 0, 0), &store, &catalog);
        let patterns: Vec<u8> = {
            let mut masks: Vec<u8> = batches
                .keys()
                .filter_map(|key| key.pattern.map(|pattern| pattern.mask))
                .collect();
            masks.sort();
            masks
        };
        // Isolated, east neighbour, west neighbour
        assert_eq!(patterns, vec![0, 2, 8]);
    }

    #[test]
    fn neighbours_across_the_chunk_boundary_count_for_culling() {
        let catalog = catalog();
        let mut store = VoxelStore::new();
        let target = Point3::new(15, 1, 1);
        store.insert(VoxelRecord::new(target, "stone"));
        for offset in [
            Point3::new(14, 1, 1),
            Point3::new(16, 1, 1),
            Point3::new(15, 0, 1),
            Point3::new(15, 2, 1),
            Point3::new(15, 1, 0),
            Point3::new(15, 1, 2),
        ] {
            store.insert(VoxelRecord::new(offset, "stone"));
        }

        let batches = ChunkMeshBuilder::collect_batches(Point3::new(0, 0, 0), &store, &catalog);
        let stone = &batches[&BatchKey::new("stone", None)];
        assert!(stone.iter().all(|record| record.position != target));
    }
}
