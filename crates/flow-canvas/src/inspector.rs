//! Inspector bound to the selected node
//!
//! Reads resolve the selection against the registry. Writes route through
//! the registry and, for deletion, clear the selection in the same step so
//! a reader never sees a dangling ID.

use serde::Serialize;

use crate::constants::copy;
use crate::events::{emit, BuilderEvent, EventSink};
use crate::registry::NodeRegistry;
use crate::selection::Selection;
use crate::types::{Node, NodeId, NodePatch};

/// What the inspector panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum InspectorView<'a> {
    Selected { node: &'a Node },
    NothingSelected,
}

impl<'a> InspectorView<'a> {
    pub fn node(&self) -> Option<&'a Node> {
        match self {
            InspectorView::Selected { node } => Some(node),
            InspectorView::NothingSelected => None,
        }
    }

    /// Capitalized kind shown in the "Type" field
    pub fn type_label(&self) -> Option<&'static str> {
        self.node().map(|n| n.kind.display_name())
    }

    /// Placeholder text when nothing is selected
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            InspectorView::Selected { .. } => None,
            InspectorView::NothingSelected => Some(copy::NOTHING_SELECTED),
        }
    }
}

/// Resolve the selection; a stale ID reads as nothing selected
pub fn inspect<'a>(registry: &'a NodeRegistry, selection: &Selection) -> InspectorView<'a> {
    match selection.current().and_then(|id| registry.get(id)) {
        Some(node) => InspectorView::Selected { node },
        None => InspectorView::NothingSelected,
    }
}

/// Write access to the selected node
pub struct Inspector<'a> {
    registry: &'a mut NodeRegistry,
    selection: &'a mut Selection,
    events: &'a dyn EventSink,
}

impl<'a> Inspector<'a> {
    pub fn new(
        registry: &'a mut NodeRegistry,
        selection: &'a mut Selection,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            registry,
            selection,
            events,
        }
    }

    pub fn view(&self) -> InspectorView<'_> {
        inspect(&*self.registry, &*self.selection)
    }

    /// Set the selected node's label. Any string is accepted, including "".
    ///
    /// Returns `false` if nothing (or a stale node) is selected.
    pub fn rename_selected(&mut self, label: impl Into<String>) -> bool {
        let Some(id) = self.selection.current().map(str::to_string) else {
            return false;
        };
        let label = label.into();
        if !self.registry.update(&id, &NodePatch::label(label.clone())) {
            return false;
        }
        emit(self.events, BuilderEvent::NodeRenamed { node_id: id, label });
        true
    }

    /// Delete the selected node and clear the selection
    ///
    /// Returns the deleted node's ID, or `None` if nothing was selected.
    pub fn delete_selected(&mut self) -> Option<NodeId> {
        let id = self.selection.current()?.to_string();
        let removed = self.registry.remove(&id);
        self.selection.clear();

        if removed.is_some() {
            emit(self.events, BuilderEvent::NodeDeleted { node_id: id.clone() });
        } else {
            log::debug!("Selected node '{}' was already gone", id);
        }
        emit(self.events, BuilderEvent::SelectionChanged { node_id: None });
        removed.map(|n| n.id)
    }
}
