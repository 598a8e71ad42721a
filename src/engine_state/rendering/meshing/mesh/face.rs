use cgmath::{EuclideanSpace, Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;

/// A single quad face of the base cube.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right,
/// upper-left) in object space, with the cube centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-right corner of the face
    pub lr: Point3<f32>,
    /// Lower-left corner of the face
    pub ll: Point3<f32>,
    /// Upper-right corner of the face
    pub ur: Point3<f32>,
    /// Upper-left corner of the face
    pub ul: Point3<f32>,
    /// Which side of the cube this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face of a cube of edge `size` centred on the origin.
    ///
    /// # Arguments
    /// * `block_side` - Which side of the cube this face represents
    /// * `size` - Edge length of the cube
    pub fn new(block_side: BlockSide, size: f32) -> Self {
        let corner = |x: u8, y: u8, z: u8| {
            (Point3::new(x as f32, y as f32, z as f32) - Vector3::new(0.5, 0.5, 0.5)) * size
        };

        let (ll, lr, ul, ur) = match block_side {
            BlockSide::FRONT => (
                corner(0, 0, 0),
                corner(0, 0, 1),
                corner(0, 1, 0),
                corner(0, 1, 1),
            ),
            BlockSide::BACK => (
                corner(1, 0, 1),
                corner(1, 0, 0),
                corner(1, 1, 1),
                corner(1, 1, 0),
            ),
            BlockSide::BOTTOM => (
                corner(0, 0, 1),
                corner(0, 0, 0),
                corner(1, 0, 1),
                corner(1, 0, 0),
            ),
            BlockSide::TOP => (
                corner(0, 1, 0),
                corner(0, 1, 1),
                corner(1, 1, 0),
                corner(1, 1, 1),
            ),
            BlockSide::LEFT => (
                corner(1, 0, 0),
                corner(0, 0, 0),
                corner(1, 1, 0),
                corner(0, 1, 0),
            ),
            BlockSide::RIGHT => (
                corner(0, 0, 1),
                corner(1, 0, 1),
                corner(0, 1, 1),
                corner(1, 1, 1),
            ),
        };

        Face {
            ll,
            lr,
            ul,
            ur,
            block_side,
        }
    }

    /// Corners in vertex emission order: ll, lr, ul, ur.
    pub fn corners(&self) -> [Point3<f32>; 4] {
        [self.ll, self.lr, self.ul, self.ur]
    }

    /// Centre of the face.
    pub fn center(&self) -> Point3<f32> {
        Point3::centroid(&self.corners())
    }
}
