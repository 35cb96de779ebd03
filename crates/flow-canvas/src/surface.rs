//! Scoped pointer subscription for a mounted surface
//!
//! A host mounts the surface once and routes every pointer event through
//! the returned guard. Unmounting is dropping the guard: any open drag is
//! ended exactly once, and no listener outlives the surface.

use std::ops::{Deref, DerefMut};

use crate::builder::WorkflowBuilder;
use crate::geometry::{Point, SurfaceBounds};
use crate::types::NodeId;

/// Pointer subscription held while a surface is mounted
pub struct SurfaceSubscription<'a> {
    builder: &'a mut WorkflowBuilder,
}

impl<'a> SurfaceSubscription<'a> {
    pub(crate) fn new(builder: &'a mut WorkflowBuilder) -> Self {
        log::debug!("Surface mounted");
        Self { builder }
    }

    /// Pointer pressed on a node
    pub fn pointer_down(&mut self, node_id: &str, pointer: Point, bounds: SurfaceBounds) -> bool {
        self.builder.pointer_down(node_id, pointer, bounds)
    }

    /// Pointer moved over the surface
    pub fn pointer_move(&mut self, pointer: Point, bounds: SurfaceBounds) -> Option<Point> {
        self.builder.pointer_move(pointer, bounds)
    }

    /// Pointer released (anywhere in the window)
    pub fn pointer_up(&mut self) -> Option<NodeId> {
        self.builder.pointer_up()
    }

    /// Pointer left the trackable region; treated as a release
    pub fn pointer_leave(&mut self) -> Option<NodeId> {
        self.builder.pointer_up()
    }

    /// Unmount explicitly; equivalent to dropping the guard
    pub fn unmount(self) {}
}

impl Deref for SurfaceSubscription<'_> {
    type Target = WorkflowBuilder;

    fn deref(&self) -> &WorkflowBuilder {
        &*self.builder
    }
}

impl DerefMut for SurfaceSubscription<'_> {
    fn deref_mut(&mut self) -> &mut WorkflowBuilder {
        &mut *self.builder
    }
}

impl Drop for SurfaceSubscription<'_> {
    fn drop(&mut self) {
        if let Some(node_id) = self.builder.pointer_up() {
            log::debug!("Surface unmounted mid-drag; released node '{}'", node_id);
        }
        log::debug!("Surface unmounted");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::drag::DragState;
    use crate::events::{BuilderEvent, VecEventSink};
    use crate::geometry::{Point, SurfaceBounds};
    use crate::palette::template_for;
    use crate::types::StepKind;
    use crate::WorkflowBuilder;

    const SURFACE: SurfaceBounds = SurfaceBounds::sized(400.0, 300.0);

    #[test]
    fn test_unmount_ends_open_drag_once() {
        let sink = Arc::new(VecEventSink::new());
        let mut builder = WorkflowBuilder::new().with_event_sink(sink.clone());

        {
            let mut surface = builder.mount_surface();
            let id = surface
                .drop_template(template_for(StepKind::Task), Point::new(150.0, 100.0), SURFACE)
                .unwrap();
            assert!(surface.pointer_down(&id, Point::new(150.0, 100.0), SURFACE));
            assert!(surface.pointer_move(Point::new(200.0, 150.0), SURFACE).is_some());
        }

        assert_eq!(*builder.drag_state(), DragState::Idle);
        let ended = sink
            .events()
            .into_iter()
            .filter(|e| matches!(e, BuilderEvent::DragEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_pointer_leave_releases() {
        let mut builder = WorkflowBuilder::new();
        let mut surface = builder.mount_surface();
        let id = surface
            .drop_template(template_for(StepKind::Delay), Point::new(150.0, 100.0), SURFACE)
            .unwrap();
        surface.pointer_down(&id, Point::new(150.0, 100.0), SURFACE);

        assert_eq!(surface.pointer_leave(), Some(id));
        assert_eq!(surface.pointer_move(Point::new(10.0, 10.0), SURFACE), None);
        surface.unmount();

        assert_eq!(builder.nodes().len(), 1);
    }
}
