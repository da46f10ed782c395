//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different entity types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (ground, walls)
    Environment = 1 << 0,
    /// Free-moving props (barrels, crates)
    Prop = 1 << 1,
}

impl CollisionGroup {
    /// Create a collision group for environment.
    pub fn environment() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Environment as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Create a collision group for props. Props rest on the environment
    /// and stack on each other.
    pub fn prop() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Prop as u32);
        let filter = Group::from_bits_retain(Self::Environment as u32 | Self::Prop as u32);
        (membership, filter)
    }
}
