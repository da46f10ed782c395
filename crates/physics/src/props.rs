//! Body and collider construction for free-moving props.
//!
//! Props are dynamic bodies tuned to fall asleep readily: a cylinder will
//! roll forever, very slowly, unless the sleep tolerance is raised above
//! the engine default. Compare to a box, which comes to a complete stop
//! easily and where a loose tolerance would risk it sleeping while
//! balanced on an edge.
//!
//! Stacking policy: compound cylinder + box. Some collision backends
//! cannot resolve cylinder-against-cylinder contacts, so every
//! cylindrical prop carries an auxiliary box slightly wider than its
//! cross-section; box-vs-box pairs always resolve and make the props
//! stackable. On a backend with native cylinder-cylinder support the
//! auxiliary box is redundant and may be dropped.

use crate::collision::CollisionGroup;
use crate::physics_world::PhysicsWorld;
use engine_core::Vec3;
use rapier3d::na::{Isometry3, Vector3};
use rapier3d::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Linear velocity below which a prop is a sleep candidate.
pub const SLEEP_LINEAR_THRESHOLD: f32 = 0.03;
/// Angular velocity below which a prop is a sleep candidate.
pub const SLEEP_ANGULAR_THRESHOLD: f32 = 0.03;
/// Number of consecutive below-threshold steps before sleeping.
pub const SLEEP_SAMPLE_WINDOW: u32 = 5;

/// Width of the stacking box relative to the cylinder radius.
pub const STACKING_FOOTPRINT_SCALE: f32 = 1.4;

fn prop_collision_groups() -> InteractionGroups {
    let (membership, filter) = CollisionGroup::prop();
    InteractionGroups::new(membership, filter)
}

impl PhysicsWorld {
    /// Add a dynamic prop body at the given world position, tagged with
    /// the owner's user data and tuned with the prop sleep thresholds.
    pub fn add_prop_body(&mut self, position: Vec3, user_data: u128) -> RigidBodyHandle {
        let time_until_sleep = SLEEP_SAMPLE_WINDOW as f32 * self.timestep();
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .can_sleep(true)
            .user_data(user_data)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let activation = body.activation_mut();
            activation.normalized_linear_threshold = SLEEP_LINEAR_THRESHOLD;
            activation.angular_threshold = SLEEP_ANGULAR_THRESHOLD;
            activation.time_until_sleep = time_until_sleep;
        }
        handle
    }

    /// Attach an upright cylinder collider carrying the body's whole mass.
    ///
    /// The collider is built with the given total mass so the body gets
    /// the inertia tensor of a solid cylinder of exactly that mass.
    pub fn add_prop_cylinder_collider(
        &mut self,
        body: RigidBodyHandle,
        mass: f32,
        radius: f32,
        height: f32,
        user_data: u128,
    ) -> ColliderHandle {
        // Rapier cylinders are Y-aligned; rotate the shape so its axis
        // lands on world Z.
        let upright = Isometry3::new(
            Vector3::zeros(),
            Vector3::x_axis().into_inner() * FRAC_PI_2,
        );
        let collider = ColliderBuilder::cylinder(height * 0.5, radius)
            .position(upright)
            .mass(mass)
            .collision_groups(prop_collision_groups())
            .user_data(user_data)
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set)
    }

    /// Attach the massless stacking box (see module docs). Footprint is
    /// `radius * STACKING_FOOTPRINT_SCALE` square, full prop height tall.
    pub fn add_prop_stacking_box_collider(
        &mut self,
        body: RigidBodyHandle,
        radius: f32,
        height: f32,
        user_data: u128,
    ) -> ColliderHandle {
        let half_footprint = radius * STACKING_FOOTPRINT_SCALE * 0.5;
        // Zero mass: collision response only, so the body's mass
        // distribution stays the cylinder's.
        let collider = ColliderBuilder::cuboid(half_footprint, half_footprint, height * 0.5)
            .mass(0.0)
            .collision_groups(prop_collision_groups())
            .user_data(user_data)
            .build();
        self.collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set)
    }
}
