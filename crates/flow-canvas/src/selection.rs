//! Single-node selection

use crate::types::NodeId;

/// Zero-or-one active node
///
/// `select` does not check that the node exists; readers resolve the ID
/// against the registry and treat a miss as "nothing selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active: Option<NodeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<NodeId>) {
        self.active = Some(id.into());
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.current() == Some(id)
    }
}
