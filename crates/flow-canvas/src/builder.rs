//! Workflow builder facade
//!
//! Owns every piece of builder state and exposes one method per host input
//! event. Hosts call these synchronously, in the order events arrive.
//!
//! # Example
//!
//! ```
//! use flow_canvas::{palette, Point, StepKind, SurfaceBounds, WorkflowBuilder};
//!
//! let mut builder = WorkflowBuilder::new();
//! let surface = SurfaceBounds::sized(640.0, 420.0);
//!
//! let payload = palette::encode_payload(palette::template_for(StepKind::Trigger)).unwrap();
//! let id = builder.drop_payload(&payload, Point::new(120.0, 80.0), surface).unwrap();
//!
//! builder.pointer_down(&id, Point::new(120.0, 80.0), surface);
//! builder.pointer_move(Point::new(200.0, 140.0), surface);
//! builder.pointer_up();
//!
//! builder.rename_selected("On new order");
//! assert_eq!(builder.preview()[0].label, "On new order");
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::constants::copy;
use crate::drag::{DragContext, DragController, DragState};
use crate::error::Result;
use crate::events::{emit, BuilderEvent, EventSink, NullEventSink};
use crate::geometry::{Point, SurfaceBounds};
use crate::id::{IdGenerator, UuidIdGenerator};
use crate::inspector::{inspect, Inspector, InspectorView};
use crate::palette;
use crate::preview::{execution_preview, render_preview, PreviewEntry};
use crate::registry::NodeRegistry;
use crate::selection::Selection;
use crate::surface::SurfaceSubscription;
use crate::types::{Node, NodeId, StepTemplate};

/// Serializable view of the whole builder, for host rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderSnapshot {
    pub nodes: Vec<Node>,
    pub selected: Option<NodeId>,
    pub dragging: Option<NodeId>,
}

/// Interactive step builder
pub struct WorkflowBuilder {
    registry: NodeRegistry,
    selection: Selection,
    drag: DragController,
    ids: Box<dyn IdGenerator>,
    events: Arc<dyn EventSink>,
}

impl WorkflowBuilder {
    /// Builder with default layout, UUID IDs and no event consumer
    pub fn new() -> Self {
        Self {
            registry: NodeRegistry::new(),
            selection: Selection::new(),
            drag: DragController::default(),
            ids: Box::new(UuidIdGenerator),
            events: Arc::new(NullEventSink),
        }
    }

    /// Builder with a custom layout
    pub fn with_config(config: CanvasConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Self::new();
        builder.drag = DragController::new(config);
        Ok(builder)
    }

    /// Replace the ID source
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Replace the event consumer
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        self.drag.config()
    }

    fn drag_parts(&mut self) -> (&mut DragController, DragContext<'_>) {
        (
            &mut self.drag,
            DragContext {
                registry: &mut self.registry,
                selection: &mut self.selection,
                ids: self.ids.as_mut(),
                events: self.events.as_ref(),
            },
        )
    }

    // ---- Palette drops ----

    /// Handle a drop carrying a JSON palette payload
    ///
    /// A malformed payload is rejected before any state changes.
    pub fn drop_payload(&mut self, payload: &str, pointer: Point, bounds: SurfaceBounds) -> Result<NodeId> {
        let template = palette::decode_payload(payload).map_err(|e| {
            log::debug!("Rejected drop: {}", e);
            e
        })?;
        self.drop_template(&template, pointer, bounds)
    }

    /// Handle a drop carrying an already decoded template
    pub fn drop_template(
        &mut self,
        template: &StepTemplate,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Result<NodeId> {
        let (drag, mut ctx) = self.drag_parts();
        drag.begin_create(&mut ctx, template, pointer, bounds)
    }

    // ---- Pointer interaction ----

    /// Pointer pressed on a node: select it and start a reposition drag
    pub fn pointer_down(&mut self, node_id: &str, pointer: Point, bounds: SurfaceBounds) -> bool {
        let (drag, mut ctx) = self.drag_parts();
        drag.begin_reposition(&mut ctx, node_id, pointer, bounds)
    }

    /// Pointer moved over the surface
    pub fn pointer_move(&mut self, pointer: Point, bounds: SurfaceBounds) -> Option<Point> {
        let (drag, mut ctx) = self.drag_parts();
        drag.stream_pointer(&mut ctx, pointer, bounds)
    }

    /// Pointer released anywhere
    pub fn pointer_up(&mut self) -> Option<NodeId> {
        self.drag.end_session(self.events.as_ref())
    }

    /// Current drag controller state
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Scoped pointer subscription for a mounted surface
    ///
    /// Dropping the returned guard unmounts the surface and ends any open drag.
    pub fn mount_surface(&mut self) -> SurfaceSubscription<'_> {
        SurfaceSubscription::new(self)
    }

    // ---- Inspector ----

    pub fn inspect(&self) -> InspectorView<'_> {
        inspect(&self.registry, &self.selection)
    }

    /// Edit the selected node's label
    pub fn rename_selected(&mut self, label: impl Into<String>) -> bool {
        Inspector::new(&mut self.registry, &mut self.selection, self.events.as_ref())
            .rename_selected(label)
    }

    /// Delete the selected node; the selection is cleared in the same step
    pub fn delete_selected(&mut self) -> Option<NodeId> {
        let deleted = Inspector::new(&mut self.registry, &mut self.selection, self.events.as_ref())
            .delete_selected()?;
        if self.drag.active_node() == Some(deleted.as_str()) {
            self.drag.end_session(self.events.as_ref());
        }
        Some(deleted)
    }

    // ---- Whole-surface actions ----

    /// Remove every node and clear the selection
    pub fn clear(&mut self) {
        self.drag.end_session(self.events.as_ref());
        let removed = self.registry.len();
        self.registry.clear();
        let had_selection = self.selection.current().is_some();
        self.selection.clear();

        log::info!("Cleared {} node(s) from the surface", removed);
        emit(self.events.as_ref(), BuilderEvent::Cleared { removed });
        if had_selection {
            emit(
                self.events.as_ref(),
                BuilderEvent::SelectionChanged { node_id: None },
            );
        }
    }

    /// Display-only "Run Test": reports the preview, executes nothing
    pub fn run(&self) -> Vec<PreviewEntry> {
        let steps = self.preview();
        log::info!("Run requested for {} step(s)", steps.len());
        emit(
            self.events.as_ref(),
            BuilderEvent::RunRequested {
                steps: steps.clone(),
            },
        );
        steps
    }

    // ---- Read-throughs ----

    /// Nodes in execution order
    pub fn nodes(&self) -> &[Node] {
        self.registry.list()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Active node ID, if any
    pub fn selected(&self) -> Option<&str> {
        self.selection.current()
    }

    pub fn preview(&self) -> Vec<PreviewEntry> {
        execution_preview(&self.registry)
    }

    /// Preview rendered as a numbered list
    pub fn preview_text(&self) -> String {
        render_preview(&self.preview())
    }

    /// Hint shown on an empty surface
    pub fn empty_hint(&self) -> Option<&'static str> {
        self.registry.is_empty().then_some(copy::EMPTY_SURFACE)
    }

    pub fn palette(&self) -> &'static [StepTemplate] {
        palette::templates()
    }

    pub fn tips(&self) -> &'static [&'static str] {
        &copy::TIPS
    }

    pub fn snapshot(&self) -> BuilderSnapshot {
        BuilderSnapshot {
            nodes: self.registry.list().to_vec(),
            selected: self.selection.current().map(str::to_string),
            dragging: self.drag.active_node().map(str::to_string),
        }
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
