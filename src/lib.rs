#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunk Core
//!
//! The chunk layer of a voxel engine: a sparse voxel store partitioned into 16³ chunks,
//! with per-chunk instanced render batches and per-chunk static collision bodies kept
//! in sync with it incrementally.
//!
//! ## Key Modules
//!
//! * `core` - Single-threaded shared state
//! * `engine_state` - The `VoxelWorld` facade with its voxel, rendering, physics and
//!   scheduling subsystems
//! * `config` / `error` - World configuration and the crate error type
//!
//! ## Architecture
//!
//! The crate owns no GPU or physics code. It drives three collaborators supplied by
//! the embedding engine:
//! * A [`Scene`] that creates groups, materials, geometries and instances
//! * A [`TextureLoader`] that resolves texture paths asynchronously
//! * An optional [`PhysicsWorld`] that holds static mesh bodies
//!
//! ## Usage
//!
//! ```ignore
//! voxel_chunk_core::init_logger();
//!
//! let catalog = BlockCatalog::from_json_str(&blocks_json)?;
//! let world = VoxelWorld::builder(catalog, Box::new(scene), Rc::new(loader))
//!     .physics(Box::new(physics))
//!     .build();
//!
//! world.load_initial_world(parse_world_records(&world_json)?).await;
//!
//! // Once per frame
//! world.update().await;
//! ```

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::WorldConfig;
pub use engine_state::{
    physics::{BodyHandle, MergedCollisionMesh, PhysicsWorld, ShapeHandle},
    rendering::{
        autotile::{AutoTilePattern, InnerCorner},
        meshing::{
            mesh::{BaseGeometry, GeometryGroup},
            ChunkRenderSummary,
        },
        resource_cache::BatchKey,
        GeometryHandle, GeometryVertex, InstanceHandle, InstanceTransform, MaterialDescriptor,
        MaterialHandle, NodeHandle, Scene, TextureHandle, TextureLoader,
    },
    voxels::{
        block::{AutoTileConfig, BlockCatalog, BlockDefinition, BlockTextures, BlockTypeId},
        chunk::{chunk_position_of, CHUNK_DIMENSION},
        record::{parse_world_records, VoxelRecord, WorldRecord},
        world::VoxelStore,
    },
    VoxelWorld, VoxelWorldBuilder, WorldStats,
};
pub use error::{physics_error, scene_error, texture_error, VoxelError, VoxelResult};

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_family = "wasm")] {
        /// Installs the browser console logger and panic hook.
        pub fn init_logger() {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::warn!("Logger already initialized");
            }
        }
    } else {
        /// Installs `env_logger`, writing to stdout and filtered by `RUST_LOG`.
        pub fn init_logger() {
            let mut log_builder = env_logger::Builder::new();
            if log_builder
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init()
                .is_ok()
            {
                log::info!("Logger initialized");
            }
        }
    }
}
