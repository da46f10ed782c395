//! The renderable scene graph.
//!
//! Nodes live in a slot arena with generational handles, so a handle kept
//! past its node's removal can never alias a later occupant of the slot.

use crate::{Model, SceneError};
use engine_core::Transform;

/// Handle to a node in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: u32,
    generation: u32,
}

/// A renderable node: a named model instance with a world transform.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub model_name: String,
    pub transform: Transform,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Flat scene graph consumed by the renderer each frame.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node rendering the given model, initially at the origin.
    pub fn add_model(&mut self, name: &str, model: &Model) -> NodeHandle {
        let node = SceneNode {
            name: name.to_string(),
            model_name: model.name().to_string(),
            transform: Transform::default(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeHandle {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Remove a node from the scene, retiring its handle's generation.
    pub fn remove(&mut self, handle: NodeHandle) -> Result<(), SceneError> {
        let slot = self.live_slot_mut(handle)?;
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        Ok(())
    }

    /// Set a node's world transform for the next render pass.
    pub fn set_transform(&mut self, handle: NodeHandle, transform: Transform) -> Result<(), SceneError> {
        let slot = self.live_slot_mut(handle)?;
        if let Some(node) = slot.node.as_mut() {
            node.transform = transform;
        }
        Ok(())
    }

    /// Borrow a node if its handle is still live.
    pub fn node(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Iterate over live nodes (what the renderer consumes).
    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.slots.iter().filter_map(|slot| slot.node.as_ref())
    }

    fn live_slot_mut(&mut self, handle: NodeHandle) -> Result<&mut Slot, SceneError> {
        let slot = self
            .slots
            .get_mut(handle.index as usize)
            .ok_or(SceneError::StaleNode)?;
        if slot.generation != handle.generation || slot.node.is_none() {
            return Err(SceneError::StaleNode);
        }
        Ok(slot)
    }
}
