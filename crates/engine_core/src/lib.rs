//! Core types shared across the simulation crates.
//!
//! This crate provides the foundational pieces the other systems build on:
//! - Transform for spatial state handed between physics and the scene graph
//! - Frame clock for the fixed-timestep simulation loop

pub mod clock;
pub mod transform;

pub use clock::*;
pub use transform::*;

// Re-export commonly used math types
pub use glam::{Mat4, Quat, Vec3};
