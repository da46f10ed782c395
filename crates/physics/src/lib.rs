//! Physics system using Rapier3D for the barrelyard simulation.

pub mod collision;
pub mod physics_world;
pub mod props;

pub use collision::*;
pub use physics_world::*;
pub use props::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
