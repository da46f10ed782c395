//! The barrel prop: a physically simulated cylinder that stacks.
//!
//! A barrel has two representations that must stay in sync: a dynamics
//! body with the mass distribution of a solid cylinder, and a scene node
//! rendering the model. The body lives at the model's bounding-box
//! centroid while the node lives at the model's pivot, so every frame the
//! body pose is translated back by the center offset before it reaches
//! the scene graph. Physics drives rendering, never the reverse.

use anyhow::{bail, Result};
use engine_core::Vec3;
use physics::{ColliderHandle, PhysicsWorld, RigidBodyHandle};
use scene::{Assets, Model, NodeHandle, SceneGraph};

use crate::config::ObjectConfig;

/// The four scene-scoped resources a barrel owns while attached.
/// They are acquired together on scene entry and released together on
/// scene exit; there is no partially-attached state.
#[derive(Debug, Clone, Copy)]
struct SceneResources {
    node: NodeHandle,
    body: RigidBodyHandle,
    primary: ColliderHandle,
    auxiliary: ColliderHandle,
}

pub struct Barrel {
    name: String,
    model_name: String,
    /// Owner-assigned id, stored as the user-data tag on the body and
    /// colliders so physics callbacks can recover this barrel.
    id: u64,
    mass: f32,
    /// Offset from the model's pivot to its bounding-box centroid.
    center: Vec3,
    radius: f32,
    height: f32,
    /// Logical (pivot) position; the body spawns at `position + center`.
    position: Vec3,
    attached: Option<SceneResources>,
}

impl Barrel {
    /// Build a barrel from its object config: reads `name`, `model`,
    /// `mass` and an optional spawn position `x`/`y`/`z`.
    pub fn from_config(config: &ObjectConfig, assets: &Assets, id: u64) -> Result<Self> {
        let name = config.string("name")?;
        let model_name = config.string("model")?;
        let mass = config.numberf("mass")?;
        let position = Vec3::new(
            config.numberf_or("x", 0.0),
            config.numberf_or("y", 0.0),
            config.numberf_or("z", 0.0),
        );
        Self::new(&name, &model_name, mass, position, assets, id)
    }

    pub fn new(
        name: &str,
        model_name: &str,
        mass: f32,
        position: Vec3,
        assets: &Assets,
        id: u64,
    ) -> Result<Self> {
        let model = assets.model(model_name)?;
        let (center, radius, height) = derive_dimensions(model)?;
        Ok(Self {
            name: name.to_string(),
            model_name: model_name.to_string(),
            id,
            mass,
            center,
            radius,
            height,
            position,
            attached: None,
        })
    }

    /// Enter the scene: acquire the node, the body at the centroid, and
    /// both collision shapes. A logged no-op if already attached.
    pub fn add_to_scene(
        &mut self,
        scene: &mut SceneGraph,
        physics: &mut PhysicsWorld,
        assets: &Assets,
    ) -> Result<()> {
        if self.attached.is_some() {
            log::warn!("barrel '{}' is already in the scene", self.name);
            return Ok(());
        }
        let model = assets.model(&self.model_name)?;
        let tag = self.id as u128;
        let node = scene.add_model(&self.name, model);
        let body = physics.add_prop_body(self.position + self.center, tag);
        let primary =
            physics.add_prop_cylinder_collider(body, self.mass, self.radius, self.height, tag);
        let auxiliary =
            physics.add_prop_stacking_box_collider(body, self.radius, self.height, tag);
        self.attached = Some(SceneResources {
            node,
            body,
            primary,
            auxiliary,
        });
        Ok(())
    }

    /// Leave the scene, releasing all four resources. Colliders go first
    /// so they detach cleanly, the body last. Idempotent when detached.
    pub fn remove_from_scene(&mut self, scene: &mut SceneGraph, physics: &mut PhysicsWorld) {
        let Some(resources) = self.attached.take() else {
            log::debug!("barrel '{}' is not in the scene, nothing to release", self.name);
            return;
        };
        if let Err(e) = scene.remove(resources.node) {
            log::warn!("barrel '{}': releasing scene node: {}", self.name, e);
        }
        physics.remove_collider(resources.primary);
        physics.remove_collider(resources.auxiliary);
        physics.remove_body(resources.body);
    }

    /// Per-step sync: read the body pose, undo the center offset, and
    /// push the result to the scene node. No-op while detached.
    pub fn on_step(&self, physics: &PhysicsWorld, scene: &mut SceneGraph) {
        let Some(resources) = &self.attached else {
            return;
        };
        let Some(pose) = physics.body_pose_with_offset(resources.body, -self.center) else {
            return;
        };
        if let Err(e) = scene.set_transform(resources.node, pose) {
            log::warn!("barrel '{}': updating scene node: {}", self.name, e);
        }
    }

    /// Move the spawn position. Only meaningful while detached; the body
    /// owns the position once attached.
    pub fn set_position(&mut self, position: Vec3) {
        if self.attached.is_some() {
            log::warn!(
                "barrel '{}' is in the scene; spawn position change ignored",
                self.name
            );
            return;
        }
        self.position = position;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    pub fn node_handle(&self) -> Option<NodeHandle> {
        self.attached.map(|r| r.node)
    }

    pub fn body_handle(&self) -> Option<RigidBodyHandle> {
        self.attached.map(|r| r.body)
    }

    pub fn primary_collider(&self) -> Option<ColliderHandle> {
        self.attached.map(|r| r.primary)
    }

    pub fn auxiliary_collider(&self) -> Option<ColliderHandle> {
        self.attached.map(|r| r.auxiliary)
    }
}

/// Derive the physical parameters from the model's bounding box:
/// centroid, radius from the larger horizontal extent, height from Z.
/// Degenerate (non-positive) extents are a configuration error.
fn derive_dimensions(model: &Model) -> Result<(Vec3, f32, f32)> {
    let lower = model.lower_bound();
    let upper = model.upper_bound();
    let extent = upper - lower;
    if extent.x <= 0.0 || extent.y <= 0.0 || extent.z <= 0.0 {
        bail!(
            "model '{}' has degenerate bounds {:?}..{:?}",
            model.name(),
            lower,
            upper
        );
    }
    let center = (lower + upper) * 0.5;
    let radius = extent.x.max(extent.y) * 0.5;
    let height = extent.z;
    Ok((center, radius, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::{
        GRAVITY_Z_UP, SLEEP_ANGULAR_THRESHOLD, SLEEP_LINEAR_THRESHOLD, SLEEP_SAMPLE_WINDOW,
        STACKING_FOOTPRINT_SCALE,
    };

    /// Pivot-at-base barrel model: 1x1 footprint, 1 unit tall.
    fn test_assets() -> Assets {
        let mut assets = Assets::new();
        assets.insert(Model::with_bounds(
            "barrel",
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, 0.5, 1.0),
        ));
        assets
    }

    fn test_world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(GRAVITY_Z_UP);
        world.add_ground_plane();
        world
    }

    /// Worked example: lower=(-1,-2,0), upper=(1,2,4) gives
    /// center=(0,0,2), radius=2, height=4.
    #[test]
    fn dimension_derivation() {
        let mut assets = Assets::new();
        assets.insert(Model::with_bounds(
            "tall",
            Vec3::new(-1.0, -2.0, 0.0),
            Vec3::new(1.0, 2.0, 4.0),
        ));
        let barrel = Barrel::new("b", "tall", 10.0, Vec3::ZERO, &assets, 0).unwrap();
        assert_eq!(barrel.center(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(barrel.radius(), 2.0);
        assert_eq!(barrel.height(), 4.0);
    }

    /// A flat model (zero Z extent) is rejected at construction.
    #[test]
    fn degenerate_bounds_rejected() {
        let mut assets = Assets::new();
        assets.insert(Model::with_bounds("flat", Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));
        assert!(Barrel::new("b", "flat", 10.0, Vec3::ZERO, &assets, 0).is_err());
    }

    /// A missing model is the asset cache's error, surfaced at construction.
    #[test]
    fn unknown_model_rejected() {
        let assets = Assets::new();
        assert!(Barrel::new("b", "ghost", 10.0, Vec3::ZERO, &assets, 0).is_err());
    }

    /// The body spawns at logical position + center offset.
    #[test]
    fn body_spawns_at_centroid() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel =
            Barrel::new("b", "barrel", 25.0, Vec3::new(5.0, 0.0, 0.0), &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let body = barrel.body_handle().unwrap();
        let pose = world.body_transform(body).unwrap();
        // center of the test model is (0, 0, 0.5)
        assert!((pose.position - Vec3::new(5.0, 0.0, 0.5)).length() < 1e-6);
    }

    /// The node receives the body pose translated back by -center, and
    /// repeated syncs without stepping do not drift.
    #[test]
    fn sync_undoes_center_offset() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let logical = Vec3::new(-2.0, 3.0, 0.0);
        let mut barrel = Barrel::new("b", "barrel", 25.0, logical, &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        for _ in 0..3 {
            barrel.on_step(&world, &mut scene);
            let node = scene.node(barrel.node_handle().unwrap()).unwrap();
            assert!((node.transform.position - logical).length() < 1e-6);
        }
    }

    /// Auxiliary box dimensions are radius*1.4 square by full height.
    #[test]
    fn auxiliary_box_dimensions() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 25.0, Vec3::ZERO, &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let aux = barrel.auxiliary_collider().unwrap();
        let shape = world.collider_set.get(aux).unwrap().shape();
        let cuboid = shape.as_cuboid().unwrap();
        let expected_half = barrel.radius() * STACKING_FOOTPRINT_SCALE * 0.5;
        assert!((cuboid.half_extents.x - expected_half).abs() < 1e-6);
        assert!((cuboid.half_extents.y - expected_half).abs() < 1e-6);
        assert!((cuboid.half_extents.z - barrel.height() * 0.5).abs() < 1e-6);
    }

    /// The primary shape is a cylinder of the derived radius and height.
    #[test]
    fn primary_cylinder_dimensions() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 25.0, Vec3::ZERO, &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let primary = barrel.primary_collider().unwrap();
        let shape = world.collider_set.get(primary).unwrap().shape();
        let cylinder = shape.as_cylinder().unwrap();
        assert!((cylinder.radius - barrel.radius()).abs() < 1e-6);
        assert!((cylinder.half_height - barrel.height() * 0.5).abs() < 1e-6);
    }

    /// Sleep thresholds are the fixed prop constants for every body.
    #[test]
    fn sleep_tuning_applied() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 3.0, Vec3::ZERO, &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let body = world.rigid_body_set.get(barrel.body_handle().unwrap()).unwrap();
        let activation = body.activation();
        assert_eq!(activation.normalized_linear_threshold, SLEEP_LINEAR_THRESHOLD);
        assert_eq!(activation.angular_threshold, SLEEP_ANGULAR_THRESHOLD);
        let window = SLEEP_SAMPLE_WINDOW as f32 * world.timestep();
        assert!((activation.time_until_sleep - window).abs() < 1e-6);
    }

    /// Attach/detach is a clean pair: all handles null after detach,
    /// nothing left in the scene or physics sets, and a re-attach
    /// creates fresh resources.
    #[test]
    fn attach_detach_reattach() {
        let assets = test_assets();
        let mut world = test_world();
        let ground_colliders = world.collider_set.len();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 25.0, Vec3::ZERO, &assets, 0).unwrap();

        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let first_node = barrel.node_handle().unwrap();
        assert!(barrel.is_attached());

        barrel.remove_from_scene(&mut scene, &mut world);
        assert!(!barrel.is_attached());
        assert!(barrel.node_handle().is_none());
        assert!(barrel.body_handle().is_none());
        assert!(barrel.primary_collider().is_none());
        assert!(barrel.auxiliary_collider().is_none());
        assert_eq!(scene.node_count(), 0);
        assert_eq!(world.rigid_body_set.len(), 0);
        assert_eq!(world.collider_set.len(), ground_colliders);

        // Detach again: idempotent no-op.
        barrel.remove_from_scene(&mut scene, &mut world);
        assert!(!barrel.is_attached());

        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        assert!(barrel.is_attached());
        assert_ne!(barrel.node_handle().unwrap(), first_node);
        assert_eq!(scene.node_count(), 1);
    }

    /// Attaching twice leaves the first set of resources untouched.
    #[test]
    fn double_attach_is_noop() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 25.0, Vec3::ZERO, &assets, 0).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let node = barrel.node_handle().unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        assert_eq!(barrel.node_handle().unwrap(), node);
        assert_eq!(scene.node_count(), 1);
        assert_eq!(world.rigid_body_set.len(), 1);
    }

    /// Two stacked barrels register an active contact through their
    /// auxiliary boxes — the pair that makes stacking work.
    #[test]
    fn stacked_barrels_touch_via_auxiliary_boxes() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut lower = Barrel::new("low", "barrel", 25.0, Vec3::ZERO, &assets, 0).unwrap();
        // Slight overlap so the very first step already has a manifold.
        let mut upper =
            Barrel::new("high", "barrel", 25.0, Vec3::new(0.0, 0.0, 0.95), &assets, 1).unwrap();
        lower.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        upper.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        world.step();
        assert!(world.contact_active(
            lower.auxiliary_collider().unwrap(),
            upper.auxiliary_collider().unwrap()
        ));
    }

    /// The body carries the barrel's id as its user-data tag.
    #[test]
    fn user_data_recovers_owner() {
        let assets = test_assets();
        let mut world = test_world();
        let mut scene = SceneGraph::new();
        let mut barrel = Barrel::new("b", "barrel", 25.0, Vec3::ZERO, &assets, 42).unwrap();
        barrel.add_to_scene(&mut scene, &mut world, &assets).unwrap();
        let body = barrel.body_handle().unwrap();
        assert_eq!(world.body_user_data(body), Some(42));
    }
}
