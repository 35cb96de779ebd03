//! Drag session controller
//!
//! Mediates the two pointer interactions against the registry:
//!
//! - **Create**: a palette item dropped on the surface. Atomic: the drop
//!   position is offset, clamped, and turned into a node in one step.
//! - **Reposition**: pointer-down on a node opens a session that records the
//!   grab offset; every pointer-move re-clamps and writes the new position
//!   until pointer-up closes it.
//!
//! # State machine
//!
//! ```text
//! Idle --begin_reposition(valid id)--> Repositioning
//! Repositioning --stream_pointer--> Repositioning
//! Repositioning --end_session--> Idle
//! Idle --begin_create--> Idle
//! Idle --begin_reposition(unknown id)--> Idle
//! ```
//!
//! A new interaction arriving while a reposition session is open
//! force-closes that session first. The last streamed position is kept,
//! exactly as if pointer-up had been delivered.

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::error::Result;
use crate::events::{emit, BuilderEvent, EventSink};
use crate::geometry::{clamp_position, Point, SurfaceBounds};
use crate::id::IdGenerator;
use crate::registry::NodeRegistry;
use crate::selection::Selection;
use crate::types::{Node, NodeId, NodePatch, StepTemplate};

/// An open reposition drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositionSession {
    /// Node being dragged
    pub node_id: NodeId,
    /// Pointer position relative to the node's top-left corner at grab time
    pub offset: Point,
}

/// Externally observable controller state
///
/// Create drags never appear here: they complete within `begin_create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Repositioning(RepositionSession),
}

/// Mutable builder state a drag operates on
pub struct DragContext<'a> {
    pub registry: &'a mut NodeRegistry,
    pub selection: &'a mut Selection,
    pub ids: &'a mut dyn IdGenerator,
    pub events: &'a dyn EventSink,
}

impl DragContext<'_> {
    fn select(&mut self, id: &str) {
        if !self.selection.is_selected(id) {
            self.selection.select(id);
            emit(
                self.events,
                BuilderEvent::SelectionChanged {
                    node_id: Some(id.to_string()),
                },
            );
        }
    }
}

/// Drives create and reposition interactions
#[derive(Debug, Clone, Default)]
pub struct DragController {
    config: CanvasConfig,
    state: DragState,
}

impl DragController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            state: DragState::Idle,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// ID of the node under an open reposition drag
    pub fn active_node(&self) -> Option<&str> {
        match &self.state {
            DragState::Repositioning(session) => Some(&session.node_id),
            DragState::Idle => None,
        }
    }

    /// Surface-local, clamped position for a pointer shifted by `shift`
    fn place(&self, pointer: Point, shift: Point, bounds: &SurfaceBounds) -> Point {
        let raw = bounds.to_local(pointer) + shift;
        clamp_position(raw, bounds, self.config.footprint, self.config.inset)
    }

    /// Drop a template onto the surface
    ///
    /// Creates the node, appends it, and selects it. Returns the new ID.
    pub fn begin_create(
        &mut self,
        ctx: &mut DragContext<'_>,
        template: &StepTemplate,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Result<NodeId> {
        self.force_close(ctx, "create");

        let position = self.place(pointer, self.config.centering_offset, &bounds);
        let id = ctx.ids.next_id();
        let node = Node::from_template(id.clone(), template, position);

        ctx.registry.append(node.clone())?;
        log::debug!(
            "Created {} node '{}' at ({}, {})",
            node.kind,
            id,
            position.x,
            position.y
        );
        emit(ctx.events, BuilderEvent::NodeCreated { node });
        ctx.select(&id);

        Ok(id)
    }

    /// Grab an existing node
    ///
    /// Returns `false` and changes nothing if the node does not exist.
    pub fn begin_reposition(
        &mut self,
        ctx: &mut DragContext<'_>,
        node_id: &str,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> bool {
        let Some(node) = ctx.registry.get(node_id) else {
            log::debug!("Reposition ignored for missing node '{}'", node_id);
            return false;
        };
        let offset = bounds.to_local(pointer) - node.position();

        self.force_close(ctx, "reposition");

        ctx.select(node_id);
        self.state = DragState::Repositioning(RepositionSession {
            node_id: node_id.to_string(),
            offset,
        });
        emit(
            ctx.events,
            BuilderEvent::DragStarted {
                node_id: node_id.to_string(),
            },
        );
        true
    }

    /// Move the grabbed node to follow the pointer
    ///
    /// Returns the applied position, or `None` when idle or when the node
    /// was deleted mid-drag.
    pub fn stream_pointer(
        &mut self,
        ctx: &mut DragContext<'_>,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Option<Point> {
        let DragState::Repositioning(session) = &self.state else {
            return None;
        };
        let position = self.place(pointer, Point::new(-session.offset.x, -session.offset.y), &bounds);

        let previous = ctx.registry.get(&session.node_id)?.position();
        if previous == position {
            return Some(position);
        }

        ctx.registry
            .update(&session.node_id, &NodePatch::position(position));
        emit(
            ctx.events,
            BuilderEvent::NodeMoved {
                node_id: session.node_id.clone(),
                x: position.x,
                y: position.y,
            },
        );
        Some(position)
    }

    /// Close any open session. Safe to call when idle.
    ///
    /// Returns the node that was being dragged, if any.
    pub fn end_session(&mut self, events: &dyn EventSink) -> Option<NodeId> {
        match std::mem::take(&mut self.state) {
            DragState::Repositioning(session) => {
                log::debug!("Drag ended for node '{}'", session.node_id);
                emit(
                    events,
                    BuilderEvent::DragEnded {
                        node_id: session.node_id.clone(),
                    },
                );
                Some(session.node_id)
            }
            DragState::Idle => None,
        }
    }

    fn force_close(&mut self, ctx: &mut DragContext<'_>, incoming: &str) {
        if let Some(node_id) = self.active_node().map(str::to_string) {
            log::warn!(
                "Closing open drag on '{}' before starting {} interaction",
                node_id,
                incoming
            );
            self.end_session(ctx.events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::VecEventSink;
    use crate::id::SequentialIdGenerator;
    use crate::palette::template_for;
    use crate::types::StepKind;

    struct Harness {
        registry: NodeRegistry,
        selection: Selection,
        ids: SequentialIdGenerator,
        events: VecEventSink,
        drag: DragController,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                registry: NodeRegistry::new(),
                selection: Selection::new(),
                ids: SequentialIdGenerator::default(),
                events: VecEventSink::new(),
                drag: DragController::default(),
            }
        }

        fn ctx(&mut self) -> (&mut DragController, DragContext<'_>) {
            (
                &mut self.drag,
                DragContext {
                    registry: &mut self.registry,
                    selection: &mut self.selection,
                    ids: &mut self.ids,
                    events: &self.events,
                },
            )
        }

        fn create(&mut self, kind: StepKind, pointer: Point, bounds: SurfaceBounds) -> NodeId {
            let (drag, mut ctx) = self.ctx();
            drag.begin_create(&mut ctx, template_for(kind), pointer, bounds)
                .unwrap()
        }

        fn grab(&mut self, id: &str, pointer: Point, bounds: SurfaceBounds) -> bool {
            let (drag, mut ctx) = self.ctx();
            drag.begin_reposition(&mut ctx, id, pointer, bounds)
        }

        fn stream(&mut self, pointer: Point, bounds: SurfaceBounds) -> Option<Point> {
            let (drag, mut ctx) = self.ctx();
            drag.stream_pointer(&mut ctx, pointer, bounds)
        }
    }

    const SURFACE: SurfaceBounds = SurfaceBounds::sized(400.0, 300.0);

    fn expected_drop(pointer: Point, bounds: &SurfaceBounds) -> Point {
        let config = CanvasConfig::default();
        let raw = bounds.to_local(pointer) + config.centering_offset;
        clamp_position(raw, bounds, config.footprint, config.inset)
    }

    #[test]
    fn test_create_applies_offset_and_clamp() {
        let mut h = Harness::new();
        let pointer = Point::new(50.0, 50.0);
        let id = h.create(StepKind::Trigger, pointer, SURFACE);

        let node = h.registry.get(&id).unwrap();
        assert_eq!(node.position(), expected_drop(pointer, &SURFACE));
        assert_eq!(node.position(), Point::new(10.0, 34.0));
        assert_eq!(h.selection.current(), Some(id.as_str()));
        assert!(h.drag.is_idle());
    }

    #[test]
    fn test_create_near_corner_is_clamped() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(5.0, 5.0), SURFACE);
        assert_eq!(h.registry.get(&id).unwrap().position(), Point::new(8.0, 8.0));

        let id = h.create(StepKind::Task, Point::new(399.0, 299.0), SURFACE);
        assert_eq!(h.registry.get(&id).unwrap().position(), Point::new(292.0, 252.0));
    }

    #[test]
    fn test_create_uses_surface_origin() {
        let mut h = Harness::new();
        let bounds = SurfaceBounds::new(Point::new(300.0, 200.0), 400.0, 300.0);
        let pointer = Point::new(420.0, 300.0);
        let id = h.create(StepKind::Delay, pointer, bounds);

        assert_eq!(h.registry.get(&id).unwrap().position(), Point::new(80.0, 84.0));
        assert_eq!(h.registry.get(&id).unwrap().position(), expected_drop(pointer, &bounds));
    }

    #[test]
    fn test_create_duplicate_id_changes_nothing() {
        let mut h = Harness::new();
        let mut fixed = || "same".to_string();
        let events = VecEventSink::new();
        let mut ctx = DragContext {
            registry: &mut h.registry,
            selection: &mut h.selection,
            ids: &mut fixed,
            events: &events,
        };
        let template = template_for(StepKind::Task);
        h.drag
            .begin_create(&mut ctx, template, Point::new(100.0, 100.0), SURFACE)
            .unwrap();
        ctx.selection.clear();

        let err = h
            .drag
            .begin_create(&mut ctx, template, Point::new(200.0, 200.0), SURFACE)
            .unwrap_err();
        assert!(matches!(err, crate::FlowCanvasError::DuplicateId(_)));
        assert_eq!(h.registry.len(), 1);
        assert_eq!(h.selection.current(), None);
    }

    #[test]
    fn test_reposition_keeps_grab_offset() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        let start = h.registry.get(&id).unwrap().position();

        // Grab 20px right and 10px below the node's corner.
        let grab = start + Point::new(20.0, 10.0);
        assert!(h.grab(&id, grab, SURFACE));
        assert_eq!(h.drag.active_node(), Some(id.as_str()));

        let moved = h.stream(grab + Point::new(30.0, 40.0), SURFACE).unwrap();
        assert_eq!(moved, start + Point::new(30.0, 40.0));
        assert_eq!(h.registry.get(&id).unwrap().position(), moved);
    }

    #[test]
    fn test_reposition_clamps_to_surface() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        let start = h.registry.get(&id).unwrap().position();

        h.grab(&id, start, SURFACE);
        assert_eq!(h.stream(Point::new(-500.0, -500.0), SURFACE), Some(Point::new(8.0, 8.0)));
        assert_eq!(h.stream(Point::new(5000.0, 5000.0), SURFACE), Some(Point::new(292.0, 252.0)));
    }

    #[test]
    fn test_reposition_only_changes_position() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Condition, Point::new(150.0, 100.0), SURFACE);
        let before = h.registry.get(&id).unwrap().clone();

        h.grab(&id, Point::new(150.0, 100.0), SURFACE);
        h.stream(Point::new(210.0, 160.0), SURFACE);
        h.drag.end_session(&h.events);

        let after = h.registry.get(&id).unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.kind, before.kind);
        assert_eq!(after.label, before.label);
        assert_eq!(after.category, before.category);
        assert_ne!(after.position(), before.position());
    }

    #[test]
    fn test_stream_is_idempotent() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        h.grab(&id, Point::new(150.0, 100.0), SURFACE);

        let first = h.stream(Point::new(180.0, 120.0), SURFACE);
        h.events.clear();
        let second = h.stream(Point::new(180.0, 120.0), SURFACE);

        assert_eq!(first, second);
        assert!(h.events.events().is_empty());
    }

    #[test]
    fn test_reposition_unknown_node_is_noop() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        let before = h.registry.list().to_vec();

        assert!(!h.grab("ghost", Point::new(10.0, 10.0), SURFACE));
        assert!(h.drag.is_idle());
        assert_eq!(h.registry.list(), &before[..]);
        assert_eq!(h.selection.current(), Some(id.as_str()));
    }

    #[test]
    fn test_stream_when_idle_is_noop() {
        let mut h = Harness::new();
        h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        let before = h.registry.list().to_vec();

        assert_eq!(h.stream(Point::new(10.0, 10.0), SURFACE), None);
        assert_eq!(h.registry.list(), &before[..]);
    }

    #[test]
    fn test_stream_after_node_deleted_is_noop() {
        let mut h = Harness::new();
        let id = h.create(StepKind::Task, Point::new(150.0, 100.0), SURFACE);
        h.grab(&id, Point::new(150.0, 100.0), SURFACE);
        h.registry.remove(&id);

        assert_eq!(h.stream(Point::new(10.0, 10.0), SURFACE), None);
        assert!(h.registry.is_empty());
    }

    #[test]
    fn test_end_session_when_idle() {
        let mut h = Harness::new();
        assert_eq!(h.drag.end_session(&h.events), None);
        assert!(h.events.events().is_empty());
    }

    #[test]
    fn test_new_interaction_force_closes_open_session() {
        let mut h = Harness::new();
        let first = h.create(StepKind::Trigger, Point::new(100.0, 100.0), SURFACE);
        let second = h.create(StepKind::Task, Point::new(300.0, 200.0), SURFACE);

        h.grab(&first, Point::new(100.0, 100.0), SURFACE);
        h.stream(Point::new(120.0, 110.0), SURFACE);
        let kept = h.registry.get(&first).unwrap().position();

        // Pointer-up for the first drag never arrived.
        assert!(h.grab(&second, Point::new(300.0, 200.0), SURFACE));
        assert_eq!(h.drag.active_node(), Some(second.as_str()));
        assert_eq!(h.registry.get(&first).unwrap().position(), kept);

        let third = h.create(StepKind::Delay, Point::new(50.0, 50.0), SURFACE);
        assert!(h.drag.is_idle());
        assert_eq!(h.selection.current(), Some(third.as_str()));

        let ended: Vec<_> = h
            .events
            .events()
            .into_iter()
            .filter(|e| matches!(e, BuilderEvent::DragEnded { .. }))
            .collect();
        assert_eq!(ended.len(), 2);
    }
}
