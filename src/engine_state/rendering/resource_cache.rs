//! # Resource Cache
//!
//! Shared rendering resources, reused across every chunk:
//!
//! * Textures, by path: loading (shared by every caller), loaded or failed
//! * Materials, one per loaded texture plus one flat fallback material
//! * Base geometries, one per `BatchKey`
//!
//! A batch key with an auto-tile pattern gets its own geometry because the pattern is
//! baked into the top face UVs. Nothing here is evicted before `dispose`.

use std::collections::{HashMap, HashSet};

use futures::FutureExt;
use log::{debug, warn};

use crate::engine_state::voxels::block::{
    block_side::FaceGroup, BlockCatalog, BlockDefinition, BlockTypeId,
};
use crate::error::VoxelResult;

use super::{
    autotile::{uv_rect, AutoTilePattern, UvRect},
    meshing::mesh::{BaseGeometry, FaceLayout, FaceSurface},
    texture::{SharedTextureLoad, TextureHandle, TextureLoader, TextureState},
    GeometryHandle, MaterialDescriptor, MaterialHandle, Scene,
};

fn start_load(loader: &dyn TextureLoader, path: &str) -> SharedTextureLoad {
    let path = path.to_string();
    loader
        .load_texture(&path)
        .map(move |result| match result {
            Ok(handle) => {
                debug!("Texture '{}' loaded", path);
                Some(handle)
            }
            Err(e) => {
                warn!("{}; faces using it get the fallback material", e);
                None
            }
        })
        .boxed_local()
        .shared()
}

/// Identifies one instance batch: a block type, plus its top tile when auto-tiled.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchKey {
    pub block_type: BlockTypeId,
    pub pattern: Option<AutoTilePattern>,
}

impl BatchKey {
    pub fn new(block_type: impl Into<BlockTypeId>, pattern: Option<AutoTilePattern>) -> Self {
        BatchKey {
            block_type: block_type.into(),
            pattern,
        }
    }

    /// Debug name used for the batch's base geometry.
    pub fn geometry_name(&self) -> String {
        match self.pattern {
            Some(pattern) => format!("{}#{}", self.block_type, pattern),
            None => self.block_type.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum MaterialKey {
    Texture(String),
    Fallback,
}

/// Cache of shared textures, materials and base geometries.
pub struct ResourceCache {
    textures: HashMap<String, TextureState>,
    materials: HashMap<MaterialKey, MaterialHandle>,
    geometries: HashMap<BatchKey, GeometryHandle>,
    placeholder: Option<GeometryHandle>,
    voxel_size: f32,
    fallback_color: [f32; 4],
}

impl ResourceCache {
    pub fn new(voxel_size: f32, fallback_color: [f32; 4]) -> Self {
        ResourceCache {
            textures: HashMap::new(),
            materials: HashMap::new(),
            geometries: HashMap::new(),
            placeholder: None,
            voxel_size,
            fallback_color,
        }
    }

    /// Returns a load for every catalog texture that is not resolved yet.
    ///
    /// Paths seen for the first time start loading through `loader`. Paths already
    /// loading hand back the load in flight, so each path is requested once.
    ///
    /// # Returns
    /// Distinct paths with their loads, sorted for deterministic load order.
    pub fn texture_loads(
        &mut self,
        catalog: &BlockCatalog,
        loader: &dyn TextureLoader,
    ) -> Vec<(String, SharedTextureLoad)> {
        let mut paths: Vec<&str> = catalog
            .iter()
            .flat_map(BlockDefinition::texture_paths)
            .collect();
        paths.sort_unstable();
        paths.dedup();

        let mut loads = Vec::new();
        for path in paths {
            let load = match self.textures.get(path) {
                Some(TextureState::Loading(load)) => load.clone(),
                Some(TextureState::Loaded(_) | TextureState::Failed) => continue,
                None => {
                    let load = start_load(loader, path);
                    self.textures
                        .insert(path.to_string(), TextureState::Loading(load.clone()));
                    load
                }
            };
            loads.push((path.to_string(), load));
        }
        loads
    }

    /// Remembers the outcome of a texture load.
    ///
    /// Ignored unless the path is still loading: a load that resolves after `dispose`
    /// or after another caller recorded it changes nothing.
    pub fn finish_texture(&mut self, path: &str, result: Option<TextureHandle>) {
        let Some(state) = self.textures.get_mut(path) else {
            return;
        };
        if matches!(state, TextureState::Loading(_)) {
            *state = match result {
                Some(handle) => TextureState::Loaded(handle),
                None => TextureState::Failed,
            };
        }
    }

    /// Returns the handle of a loaded texture.
    pub fn texture(&self, path: &str) -> Option<TextureHandle> {
        match self.textures.get(path) {
            Some(TextureState::Loaded(handle)) => Some(*handle),
            _ => None,
        }
    }

    /// Returns the material for one face group of a block, creating it on first use.
    ///
    /// Faces whose texture is missing or failed use the flat fallback material, as do
    /// faces whose textured material the scene refused to create.
    pub fn get_or_create_material(
        &mut self,
        scene: &mut dyn Scene,
        definition: &BlockDefinition,
        group: FaceGroup,
    ) -> VoxelResult<MaterialHandle> {
        let path = definition.texture_for(group);
        let Some(texture) = self.texture(path) else {
            return self.fallback_material(scene);
        };

        let key = MaterialKey::Texture(path.to_string());
        if let Some(material) = self.materials.get(&key) {
            return Ok(*material);
        }

        let descriptor = MaterialDescriptor::Textured {
            texture,
            path: path.to_string(),
        };
        match scene.create_material(&descriptor) {
            Ok(material) => {
                self.materials.insert(key, material);
                Ok(material)
            }
            Err(e) => {
                warn!("{}; using the fallback material for '{}'", e, path);
                self.fallback_material(scene)
            }
        }
    }

    fn fallback_material(&mut self, scene: &mut dyn Scene) -> VoxelResult<MaterialHandle> {
        if let Some(material) = self.materials.get(&MaterialKey::Fallback) {
            return Ok(*material);
        }

        let material = scene.create_material(&MaterialDescriptor::FlatColor {
            color: self.fallback_color,
        })?;
        self.materials.insert(MaterialKey::Fallback, material);
        Ok(material)
    }

    /// Returns the base geometry of a batch, creating it on first use.
    ///
    /// If the scene fails to create it, a shared placeholder cube with the fallback
    /// material is cached for the key instead.
    pub fn get_or_create_base_geometry(
        &mut self,
        scene: &mut dyn Scene,
        key: &BatchKey,
        definition: &BlockDefinition,
    ) -> VoxelResult<GeometryHandle> {
        if let Some(geometry) = self.geometries.get(key) {
            return Ok(*geometry);
        }

        let layout = self.face_layout(scene, key, definition)?;
        let geometry = BaseGeometry::cube(key.geometry_name(), self.voxel_size, &layout);

        let handle = match scene.create_geometry(&geometry) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("{}; using the placeholder cube for '{}'", e, key.geometry_name());
                self.placeholder_geometry(scene)?
            }
        };

        self.geometries.insert(key.clone(), handle);
        Ok(handle)
    }

    fn face_layout(
        &mut self,
        scene: &mut dyn Scene,
        key: &BatchKey,
        definition: &BlockDefinition,
    ) -> VoxelResult<FaceLayout> {
        let top_uv = match (&definition.auto_tile, key.pattern) {
            (Some(config), Some(pattern)) => uv_rect(config, pattern),
            _ => UvRect::FULL,
        };

        Ok(FaceLayout {
            side: FaceSurface {
                material: self.get_or_create_material(scene, definition, FaceGroup::Side)?,
                uv: UvRect::FULL,
            },
            top: FaceSurface {
                material: self.get_or_create_material(scene, definition, FaceGroup::Top)?,
                uv: top_uv,
            },
            bottom: FaceSurface {
                material: self.get_or_create_material(scene, definition, FaceGroup::Bottom)?,
                uv: UvRect::FULL,
            },
        })
    }

    /// Shared untextured cube, created on first use.
    pub fn placeholder_geometry(&mut self, scene: &mut dyn Scene) -> VoxelResult<GeometryHandle> {
        if let Some(placeholder) = self.placeholder {
            return Ok(placeholder);
        }

        let material = self.fallback_material(scene)?;
        let layout = FaceLayout::uniform(material);
        let cube = BaseGeometry::cube("placeholder", self.voxel_size, &layout);
        let placeholder = scene.create_geometry(&cube)?;
        self.placeholder = Some(placeholder);
        Ok(placeholder)
    }

    /// Number of distinct geometries held, the placeholder included.
    pub fn geometry_count(&self) -> usize {
        let mut unique: HashSet<GeometryHandle> = self.geometries.values().copied().collect();
        unique.extend(self.placeholder);
        unique.len()
    }

    /// Number of materials held, the fallback included.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Releases every geometry and material and forgets every texture.
    pub fn dispose(&mut self, scene: &mut dyn Scene) {
        let mut geometries: HashSet<GeometryHandle> =
            self.geometries.drain().map(|(_, geometry)| geometry).collect();
        geometries.extend(self.placeholder.take());
        for geometry in geometries {
            scene.dispose_geometry(geometry);
        }

        for (_, material) in self.materials.drain() {
            scene.dispose_material(material);
        }

        self.textures.clear();
    }
}
