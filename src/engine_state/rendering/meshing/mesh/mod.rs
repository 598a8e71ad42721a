//! Base geometry generation for instanced voxel rendering.
//!
//! Every batch draws one shared cube many times, so the only geometry the core ever
//! builds is that cube, with per-face-group materials and UVs.
//!
//! # Architecture
//! - [`BaseGeometry`]: Vertices, indices and material ranges handed to the scene
//! - [`Face`]: A single face of the cube with its four corners
//! - [`FaceLayout`]: Which material and UV window each face group uses

mod face;
mod mesh;

pub use face::Face;
pub use mesh::*;
