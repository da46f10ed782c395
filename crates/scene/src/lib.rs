//! Scene-side collaborators for the simulation: the model/asset registry
//! and the renderable scene graph.

pub mod graph;
pub mod model;

pub use graph::*;
pub use model::*;

/// Errors from scene and asset lookups.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("model not found: {0}")]
    ModelNotFound(String),
    #[error("stale or released node handle")]
    StaleNode,
}
