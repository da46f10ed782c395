//! Models and the asset registry.
//!
//! A model here is the simulation-facing slice of a loaded mesh: its name
//! and its axis-aligned bounds in model-local space. Vertex data, materials
//! and GPU upload live with the renderer.

use crate::SceneError;
use glam::Vec3;
use std::collections::HashMap;

/// A registered model with its local-space bounding box.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    lower: Vec3,
    upper: Vec3,
}

impl Model {
    /// Create a model from known bounds.
    pub fn with_bounds(name: &str, lower: Vec3, upper: Vec3) -> Self {
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }

    /// Create a model by computing the bounding box of its vertex positions.
    /// An empty position list yields a degenerate zero box at the origin.
    pub fn from_positions(name: &str, positions: &[Vec3]) -> Self {
        let mut lower = Vec3::ZERO;
        let mut upper = Vec3::ZERO;
        if let Some((first, rest)) = positions.split_first() {
            lower = *first;
            upper = *first;
            for p in rest {
                lower = lower.min(*p);
                upper = upper.max(*p);
            }
        }
        Self {
            name: name.to_string(),
            lower,
            upper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower corner of the local-space bounding box.
    pub fn lower_bound(&self) -> Vec3 {
        self.lower
    }

    /// Upper corner of the local-space bounding box.
    pub fn upper_bound(&self) -> Vec3 {
        self.upper
    }
}

/// Name-keyed model cache. Owns the models; objects hold only the name.
#[derive(Debug, Default)]
pub struct Assets {
    models: HashMap<String, Model>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its own name, replacing any previous entry.
    pub fn insert(&mut self, model: Model) {
        self.models.insert(model.name().to_string(), model);
    }

    /// Look up a model by name.
    pub fn model(&self, name: &str) -> Result<&Model, SceneError> {
        self.models
            .get(name)
            .ok_or_else(|| SceneError::ModelNotFound(name.to_string()))
    }
}
