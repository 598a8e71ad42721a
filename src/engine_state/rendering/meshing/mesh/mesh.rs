//! Base geometry construction.
//!
//! A base geometry is the unit cube every instance of a batch shares. It carries one
//! index range per material so the scene can draw side, top and bottom faces with
//! different textures, and the top face UVs can point at an auto-tile atlas cell.

use crate::engine_state::{
    rendering::{autotile::UvRect, GeometryVertex, MaterialHandle},
    voxels::block::block_side::{BlockSide, FaceGroup},
};

use super::face::Face;

/// A contiguous index range drawn with one material.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GeometryGroup {
    pub material: MaterialHandle,
    pub first_index: u32,
    pub index_count: u32,
}

/// Material and texture window for one face group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceSurface {
    pub material: MaterialHandle,
    pub uv: UvRect,
}

/// Surfaces of the three face groups of a cube.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceLayout {
    pub side: FaceSurface,
    pub top: FaceSurface,
    pub bottom: FaceSurface,
}

impl FaceLayout {
    /// One material with full-texture UVs on every face.
    pub fn uniform(material: MaterialHandle) -> Self {
        let surface = FaceSurface {
            material,
            uv: UvRect::FULL,
        };
        FaceLayout {
            side: surface,
            top: surface,
            bottom: surface,
        }
    }

    fn surface(&self, group: FaceGroup) -> FaceSurface {
        match group {
            FaceGroup::Side => self.side,
            FaceGroup::Top => self.top,
            FaceGroup::Bottom => self.bottom,
        }
    }
}

/// CPU-side geometry handed to `Scene::create_geometry`.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseGeometry {
    /// Debug name, unique per batch key
    pub name: String,
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
    /// Material ranges over `indices`, in face emission order
    pub groups: Vec<GeometryGroup>,
}

impl BaseGeometry {
    /// Builds a cube of edge `size` centred on the origin.
    ///
    /// Faces are emitted sides first, then top, then bottom. Consecutive faces that
    /// share a material share one `GeometryGroup`.
    ///
    /// # Returns
    /// A geometry of 24 vertices and 36 indices.
    pub fn cube(name: impl Into<String>, size: f32, layout: &FaceLayout) -> Self {
        let mut geometry = BaseGeometry {
            name: name.into(),
            vertices: Vec::with_capacity(24),
            indices: Vec::with_capacity(36),
            groups: Vec::new(),
        };

        let order = BlockSide::lateral()
            .into_iter()
            .chain([BlockSide::TOP, BlockSide::BOTTOM]);

        for (faces_generated, side) in order.enumerate() {
            let surface = layout.surface(side.face_group());
            geometry
                .vertices
                .extend(Self::generate_face_vertices(&Face::new(side, size), surface.uv));

            let first_index = geometry.indices.len() as u32;
            geometry
                .indices
                .extend(Self::generate_face_indices(faces_generated as u32));
            geometry.push_group(surface.material, first_index, 6);
        }

        geometry
    }

    fn push_group(&mut self, material: MaterialHandle, first_index: u32, index_count: u32) {
        if let Some(last) = self.groups.last_mut() {
            if last.material == material && last.first_index + last.index_count == first_index {
                last.index_count += index_count;
                return;
            }
        }
        self.groups.push(GeometryGroup {
            material,
            first_index,
            index_count,
        });
    }

    /// Generates the four vertices of a face.
    ///
    /// The lower edge maps to `v1` and the upper edge to `v0`, so textures appear
    /// upright on side faces.
    pub fn generate_face_vertices(face: &Face, uv: UvRect) -> [GeometryVertex; 4] {
        let normal = face.block_side.normal();
        [
            GeometryVertex::new(face.ll, normal, uv.u0, uv.v1),
            GeometryVertex::new(face.lr, normal, uv.u1, uv.v1),
            GeometryVertex::new(face.ul, normal, uv.u0, uv.v0),
            GeometryVertex::new(face.ur, normal, uv.u1, uv.v0),
        ]
    }

    /// Generates index data for a face, adjusted by the number of previously generated faces.
    ///
    /// # Returns
    /// Six indices forming two triangles over the face's four vertices.
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 3, base, base + 3, base + 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_cube_is_one_group() {
        let cube = BaseGeometry::cube("stone", 1.0, &FaceLayout::uniform(MaterialHandle(7)));

        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert_eq!(
            cube.groups,
            vec![GeometryGroup {
                material: MaterialHandle(7),
                first_index: 0,
                index_count: 36
            }]
        );
        assert!(cube.indices.iter().all(|&index| index < 24));
    }

    #[test]
    fn distinct_top_and_bottom_split_the_groups() {
        let mut layout = FaceLayout::uniform(MaterialHandle(1));
        layout.top.material = MaterialHandle(2);
        layout.bottom.material = MaterialHandle(3);

        let cube = BaseGeometry::cube("grass", 1.0, &layout);
        let ranges: Vec<(u64, u32, u32)> = cube
            .groups
            .iter()
            .map(|group| (group.material.0, group.first_index, group.index_count))
            .collect();
        assert_eq!(ranges, vec![(1, 0, 24), (2, 24, 6), (3, 30, 6)]);
    }

    #[test]
    fn top_face_uses_the_atlas_window() {
        let mut layout = FaceLayout::uniform(MaterialHandle(1));
        layout.top.uv = UvRect {
            u0: 0.25,
            v0: 0.5,
            u1: 0.5,
            v1: 0.75,
        };

        let cube = BaseGeometry::cube("path", 1.0, &layout);
        let top = &cube.vertices[16..20];
        assert!(top.iter().all(|vertex| vertex.normal == [0.0, 1.0, 0.0]));
        assert!(top.iter().all(|vertex| {
            (0.25..=0.5).contains(&vertex.uv[0]) && (0.5..=0.75).contains(&vertex.uv[1])
        }));
    }

    #[test]
    fn cube_spans_the_voxel_size() {
        let cube = BaseGeometry::cube("big", 2.0, &FaceLayout::uniform(MaterialHandle(1)));
        for vertex in &cube.vertices {
            assert!(vertex.position.iter().all(|c| c.abs() == 1.0));
        }
    }
}
