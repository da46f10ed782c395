//! Physics world management with Rapier3D.

use crate::collision::CollisionGroup;
use engine_core::{Transform, Vec3};
use rapier3d::prelude::*;

/// Gravity for the Z-up world convention used throughout the simulation.
pub const GRAVITY_Z_UP: Vec3 = Vec3::new(0.0, 0.0, -9.81);

/// Environment collision groups so static geometry collides with props.
fn env_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::environment();
    InteractionGroups::new(membership, filter)
}

/// Main physics world containing all simulation state.
///
/// Owned by the simulation loop and passed by reference to the objects
/// that register bodies and geometry into it; nothing here is global.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![gravity.x, gravity.y, gravity.z],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
        }
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    /// Fixed timestep the pipeline integrates per [`PhysicsWorld::step`], in seconds.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Add a ground plane collider (flat Z=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::z_axis())
            .collision_groups(env_collision_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// Remove a rigid body and any colliders still attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Get the transform of a rigid body.
    pub fn body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.body_pose_with_offset(handle, Vec3::ZERO)
    }

    /// Get the transform of a rigid body, pre-composed with a translation
    /// in the body's local frame.
    ///
    /// Passing the negated center offset of an object re-expresses the
    /// body's pose in the object's logical/pivot frame for the scene graph.
    pub fn body_pose_with_offset(
        &self,
        handle: RigidBodyHandle,
        local_offset: Vec3,
    ) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            let rotation = glam::Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w);
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z) + rotation * local_offset,
                rotation,
                scale: Vec3::ONE,
            }
        })
    }

    /// Whether a body has been put to sleep by the auto-disable logic.
    /// Returns false for unknown handles.
    pub fn is_body_sleeping(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .get(handle)
            .map(|body| body.is_sleeping())
            .unwrap_or(false)
    }

    /// Read back the user-data tag stored on a body at creation.
    pub fn body_user_data(&self, handle: RigidBodyHandle) -> Option<u128> {
        self.rigid_body_set.get(handle).map(|body| body.user_data)
    }

    /// Apply an impulse to a dynamic body, waking it if asleep.
    pub fn apply_impulse(&mut self, handle: RigidBodyHandle, impulse: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.apply_impulse(vector![impulse.x, impulse.y, impulse.z], true);
        } else {
            log::warn!("apply_impulse on unknown body handle {:?}", handle);
        }
    }

    /// Whether the narrow phase currently has an active contact between
    /// two colliders.
    pub fn contact_active(&self, a: ColliderHandle, b: ColliderHandle) -> bool {
        self.narrow_phase
            .contact_pair(a, b)
            .map(|pair| pair.has_any_active_contact)
            .unwrap_or(false)
    }
}
