//! Ordered registry of placed nodes
//!
//! Insertion order is execution order. Nothing here reorders entries:
//! appends go to the end, removals close the gap without shuffling.

use crate::error::{FlowCanvasError, Result};
use crate::types::{Node, NodePatch};

/// The canonical list of placed nodes
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node at the end
    pub fn append(&mut self, node: Node) -> Result<()> {
        if self.contains(&node.id) {
            return Err(FlowCanvasError::DuplicateId(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Apply a partial mutation
    ///
    /// Returns `false` without touching anything if the node is gone.
    pub fn update(&mut self, id: &str, patch: &NodePatch) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                patch.apply_to(node);
                true
            }
            None => {
                log::debug!("update ignored for missing node '{}'", id);
                false
            }
        }
    }

    /// Remove a node, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<Node> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(pos))
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Nodes in insertion order
    pub fn list(&self) -> &[Node] {
        &self.nodes
    }

    /// Find a node by ID
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
