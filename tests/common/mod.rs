//! Recording fakes for the scene, physics and texture collaborators.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use cgmath::Point3;
use futures::future::{self, FutureExt, LocalBoxFuture};
use voxel_chunk_core::engine_state::task_management::yield_now;
use voxel_chunk_core::*;

pub const FALLBACK: [f32; 4] = [1.0, 0.0, 1.0, 1.0];

#[derive(Default)]
pub struct SceneLog {
    next_id: u64,
    pub groups: HashMap<NodeHandle, String>,
    pub materials: HashMap<MaterialHandle, MaterialDescriptor>,
    pub geometries: HashMap<GeometryHandle, BaseGeometry>,
    pub instances: HashMap<InstanceHandle, (GeometryHandle, InstanceTransform, NodeHandle)>,
    pub geometries_created: usize,
    pub instances_created: usize,
    /// Geometry names whose creation fails
    pub failing_geometries: HashSet<String>,
}

impl SceneLog {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Translations of every live instance.
    pub fn instance_positions(&self) -> Vec<[f32; 3]> {
        self.instances
            .values()
            .map(|(_, transform, _)| transform.translation)
            .collect()
    }

    pub fn has_instance_at(&self, translation: [f32; 3]) -> bool {
        self.instance_positions().contains(&translation)
    }

    pub fn geometry_named(&self, name: &str) -> Option<&BaseGeometry> {
        self.geometries.values().find(|geometry| geometry.name == name)
    }
}

#[derive(Clone, Default)]
pub struct FakeScene {
    pub log: Rc<RefCell<SceneLog>>,
}

impl Scene for FakeScene {
    fn create_group(&mut self, name: &str) -> VoxelResult<NodeHandle> {
        let mut log = self.log.borrow_mut();
        let group = NodeHandle(log.next());
        log.groups.insert(group, name.to_string());
        Ok(group)
    }

    fn create_material(&mut self, descriptor: &MaterialDescriptor) -> VoxelResult<MaterialHandle> {
        let mut log = self.log.borrow_mut();
        let material = MaterialHandle(log.next());
        log.materials.insert(material, descriptor.clone());
        Ok(material)
    }

    fn create_geometry(&mut self, geometry: &BaseGeometry) -> VoxelResult<GeometryHandle> {
        let mut log = self.log.borrow_mut();
        if log.failing_geometries.contains(&geometry.name) {
            return Err(scene_error("create_geometry", "rejected by test"));
        }
        let handle = GeometryHandle(log.next());
        log.geometries.insert(handle, geometry.clone());
        log.geometries_created += 1;
        Ok(handle)
    }

    fn create_instance(
        &mut self,
        geometry: GeometryHandle,
        transform: &InstanceTransform,
        parent: NodeHandle,
    ) -> VoxelResult<InstanceHandle> {
        let mut log = self.log.borrow_mut();
        assert!(log.groups.contains_key(&parent), "parent group must be live");
        assert!(log.geometries.contains_key(&geometry), "geometry must be live");
        let instance = InstanceHandle(log.next());
        log.instances.insert(instance, (geometry, *transform, parent));
        log.instances_created += 1;
        Ok(instance)
    }

    fn dispose_instance(&mut self, instance: InstanceHandle) {
        let removed = self.log.borrow_mut().instances.remove(&instance);
        assert!(removed.is_some(), "instance disposed twice");
    }

    fn dispose_node(&mut self, node: NodeHandle) {
        let removed = self.log.borrow_mut().groups.remove(&node);
        assert!(removed.is_some(), "group disposed twice");
    }

    fn dispose_geometry(&mut self, geometry: GeometryHandle) {
        let removed = self.log.borrow_mut().geometries.remove(&geometry);
        assert!(removed.is_some(), "geometry disposed twice");
    }

    fn dispose_material(&mut self, material: MaterialHandle) {
        let removed = self.log.borrow_mut().materials.remove(&material);
        assert!(removed.is_some(), "material disposed twice");
    }
}

#[derive(Default)]
pub struct PhysicsLog {
    next_id: u64,
    pub shapes: HashMap<ShapeHandle, MergedCollisionMesh>,
    pub bodies: HashMap<BodyHandle, ShapeHandle>,
    pub shape_attempts: usize,
    pub fail_shapes: bool,
    /// Ordered record of removals
    pub events: Vec<String>,
}

impl PhysicsLog {
    /// Total number of voxel boxes across every live shape.
    pub fn box_count(&self) -> usize {
        self.shapes.values().map(|mesh| mesh.vertices.len() / 8).sum()
    }

    /// Returns `true` if some live shape contains a box with this minimum corner.
    pub fn has_box_with_min(&self, min: [f32; 3]) -> bool {
        self.shapes
            .values()
            .any(|mesh| mesh.vertices.chunks(8).any(|corners| corners[0] == min))
    }
}

#[derive(Clone, Default)]
pub struct FakePhysics {
    pub log: Rc<RefCell<PhysicsLog>>,
}

impl PhysicsWorld for FakePhysics {
    fn create_static_mesh_shape(&mut self, mesh: &MergedCollisionMesh) -> VoxelResult<ShapeHandle> {
        let mut log = self.log.borrow_mut();
        log.shape_attempts += 1;
        if log.fail_shapes {
            return Err(physics_error("create_static_mesh_shape", "rejected by test"));
        }
        let shape = ShapeHandle(log.next_id);
        log.next_id += 1;
        log.shapes.insert(shape, mesh.clone());
        Ok(shape)
    }

    fn create_static_body(
        &mut self,
        shape: ShapeHandle,
        origin: Point3<f32>,
    ) -> VoxelResult<BodyHandle> {
        assert_eq!(origin, Point3::new(0.0, 0.0, 0.0));
        let mut log = self.log.borrow_mut();
        let body = BodyHandle(log.next_id);
        log.next_id += 1;
        log.bodies.insert(body, shape);
        Ok(body)
    }

    fn remove_body(&mut self, body: BodyHandle) {
        let mut log = self.log.borrow_mut();
        assert!(log.bodies.remove(&body).is_some(), "body removed twice");
        log.events.push(format!("remove_body {}", body.0));
    }

    fn remove_shape(&mut self, shape: ShapeHandle) {
        let mut log = self.log.borrow_mut();
        assert!(
            !log.bodies.values().any(|used| *used == shape),
            "shape removed while a body still uses it"
        );
        assert!(log.shapes.remove(&shape).is_some(), "shape removed twice");
        log.events.push(format!("remove_shape {}", shape.0));
    }
}

#[derive(Default)]
pub struct FakeLoader {
    pub failing: HashSet<String>,
    pub requested: RefCell<Vec<String>>,
    /// Loads yield once before resolving
    pub slow: bool,
}

impl FakeLoader {
    pub fn failing(paths: &[&str]) -> Self {
        FakeLoader {
            failing: paths.iter().map(|path| path.to_string()).collect(),
            ..FakeLoader::default()
        }
    }

    pub fn slow() -> Self {
        FakeLoader {
            slow: true,
            ..FakeLoader::default()
        }
    }
}

impl TextureLoader for FakeLoader {
    fn load_texture(&self, path: &str) -> LocalBoxFuture<'static, VoxelResult<TextureHandle>> {
        let mut requested = self.requested.borrow_mut();
        requested.push(path.to_string());
        let result = if self.failing.contains(path) {
            Err(texture_error(path, "not found"))
        } else {
            Ok(TextureHandle(requested.len() as u64))
        };
        if self.slow {
            async move {
                yield_now().await;
                result
            }
            .boxed_local()
        } else {
            future::ready(result).boxed_local()
        }
    }
}

pub fn catalog() -> BlockCatalog {
    BlockCatalog::from_json_str(
        r#"{ "blocks": [
            { "id": "stone", "textures": { "side": "stone.png" } },
            { "id": "dirt", "textures": { "side": "dirt.png" } },
            { "id": "water", "isSolid": false, "textures": { "side": "water.png" } },
            {
                "id": "grass",
                "textures": { "side": "grass_side.png", "bottom": "dirt.png" },
                "autoTile": {
                    "atlasTextureId": "grass_atlas.png",
                    "atlasColumns": 4,
                    "atlasRows": 5
                }
            }
        ] }"#,
    )
    .expect("test catalog parses")
}

/// A world wired to fresh fakes.
pub struct Harness {
    pub world: VoxelWorld,
    pub scene: Rc<RefCell<SceneLog>>,
    pub physics: Rc<RefCell<PhysicsLog>>,
    pub loader: Rc<FakeLoader>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_loader(FakeLoader::default())
    }

    pub fn with_loader(loader: FakeLoader) -> Self {
        let scene = FakeScene::default();
        let physics = FakePhysics::default();
        let loader = Rc::new(loader);

        let world = VoxelWorld::builder(catalog(), Box::new(scene.clone()), loader.clone())
            .config(WorldConfig {
                fallback_color: FALLBACK,
                ..WorldConfig::default()
            })
            .physics(Box::new(physics.clone()))
            .build();

        Harness {
            world,
            scene: scene.log,
            physics: physics.log,
            loader,
        }
    }

    pub fn update(&self) {
        pollster::block_on(self.world.update());
    }

    pub fn load(&self, records: Vec<WorldRecord>) {
        pollster::block_on(self.world.load_initial_world(records));
    }

    pub fn add(&self, x: i32, y: i32, z: i32, block_type: &str) {
        self.world
            .add_block(VoxelRecord::new(Point3::new(x, y, z), block_type));
    }
}

pub fn record(position: [i32; 3], type_id: &str) -> WorldRecord {
    WorldRecord {
        position,
        type_id: type_id.into(),
        rotation: 0,
        explode: None,
    }
}

pub fn filled_cube(size: i32, type_id: &str) -> WorldRecord {
    WorldRecord {
        explode: Some([size - 1; 3]),
        ..record([0, 0, 0], type_id)
    }
}
