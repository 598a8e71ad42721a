//! # Voxel Data
//!
//! This module holds the voxel-side half of the core: what occupies each cell, and which
//! chunks have fallen behind it.
//!
//! ## Architecture
//!
//! * **Block**: The read-only block catalog and the six block faces
//! * **Chunk**: Chunk coordinate math, the solidity snapshot used for culling, cell iteration
//! * **World**: The sparse voxel store
//! * **Record**: Voxel records and the serialisable world records with `explode`
//! * **Dirty**: Visual and collision dirty sets
//!
//! ## Data Flow
//!
//! 1. Callers add, remove or bulk-load voxels in the store
//! 2. Each mutation marks the owning chunk, and boundary neighbours, dirty
//! 3. The rendering and physics builders drain their dirty sets on `update()`

pub mod block;
pub mod chunk;
pub mod dirty;
pub mod record;
pub mod world;
