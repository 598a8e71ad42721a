//! # Block Side Module
//!
//! This module defines the different faces/sides of a voxel block and the neighbour
//! offsets used for face culling and auto-tiling.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so it can index per-face arrays
/// such as the adjacency data produced by `ChunkOccupancy::generate_adjacent_blocks`.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative X)
    FRONT = 0,

    /// The back face (facing positive X)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative Z)
    LEFT = 4,

    /// The right face (facing positive Z)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The four faces that share the side texture, in emission order.
    pub fn lateral() -> [BlockSide; 4] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Returns the integer offset to the neighbouring cell across this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1, 0, 0),
            BlockSide::BACK => Vector3::new(1, 0, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(0, 0, -1),
            BlockSide::RIGHT => Vector3::new(0, 0, 1),
        }
    }

    /// Which face group this side belongs to for texturing purposes.
    pub fn face_group(self) -> FaceGroup {
        match self {
            BlockSide::TOP => FaceGroup::Top,
            BlockSide::BOTTOM => FaceGroup::Bottom,
            _ => FaceGroup::Side,
        }
    }
}

/// Texture groups of a cube: the four lateral faces share one texture, top and bottom
/// are resolved independently.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum FaceGroup {
    Side,
    Top,
    Bottom,
}
