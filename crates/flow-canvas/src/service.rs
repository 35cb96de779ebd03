//! Single-owner builder service for multi-threaded hosts
//!
//! The builder itself is a plain `&mut self` state machine. When input
//! events originate on several threads, [`BuilderService`] moves the
//! builder into one tokio task and serializes every command through an
//! mpsc queue, so events are applied strictly in arrival order.
//!
//! # Example
//!
//! ```ignore
//! let service = BuilderService::spawn(WorkflowBuilder::new());
//! let handle = service.handle();
//! let id = handle.drop_payload(payload, pointer, bounds).await?;
//! let builder = service.shutdown().await?;
//! ```

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::builder::{BuilderSnapshot, WorkflowBuilder};
use crate::constants::service::COMMAND_QUEUE_CAPACITY;
use crate::error::{FlowCanvasError, Result};
use crate::geometry::{Point, SurfaceBounds};
use crate::preview::PreviewEntry;
use crate::types::{NodeId, StepTemplate};

/// A queued builder operation with its reply channel
enum BuilderCommand {
    DropPayload {
        payload: String,
        pointer: Point,
        bounds: SurfaceBounds,
        reply: oneshot::Sender<Result<NodeId>>,
    },
    DropTemplate {
        template: StepTemplate,
        pointer: Point,
        bounds: SurfaceBounds,
        reply: oneshot::Sender<Result<NodeId>>,
    },
    PointerDown {
        node_id: NodeId,
        pointer: Point,
        bounds: SurfaceBounds,
        reply: oneshot::Sender<bool>,
    },
    PointerMove {
        pointer: Point,
        bounds: SurfaceBounds,
        reply: oneshot::Sender<Option<Point>>,
    },
    PointerUp {
        reply: oneshot::Sender<Option<NodeId>>,
    },
    RenameSelected {
        label: String,
        reply: oneshot::Sender<bool>,
    },
    DeleteSelected {
        reply: oneshot::Sender<Option<NodeId>>,
    },
    Clear {
        reply: oneshot::Sender<()>,
    },
    Run {
        reply: oneshot::Sender<Vec<PreviewEntry>>,
    },
    Preview {
        reply: oneshot::Sender<Vec<PreviewEntry>>,
    },
    Snapshot {
        reply: oneshot::Sender<BuilderSnapshot>,
    },
    Shutdown,
}

/// Owns the task running a builder
pub struct BuilderService {
    handle: BuilderHandle,
    task: JoinHandle<WorkflowBuilder>,
}

impl BuilderService {
    /// Move a builder into a new task. Must be called inside a tokio runtime.
    pub fn spawn(builder: WorkflowBuilder) -> Self {
        let (sender, inbox) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let task = tokio::spawn(run(builder, inbox));
        Self {
            handle: BuilderHandle { sender },
            task,
        }
    }

    /// A cloneable handle for sending commands
    pub fn handle(&self) -> BuilderHandle {
        self.handle.clone()
    }

    /// Stop the task after draining commands queued so far, returning the builder
    pub async fn shutdown(self) -> Result<WorkflowBuilder> {
        // If the task already exited the send fails; the join below still reports it.
        let _ = self.handle.sender.send(BuilderCommand::Shutdown).await;
        self.task.await.map_err(|e| {
            log::warn!("Builder service task failed: {}", e);
            FlowCanvasError::ServiceClosed
        })
    }
}

async fn run(mut builder: WorkflowBuilder, mut inbox: mpsc::Receiver<BuilderCommand>) -> WorkflowBuilder {
    log::debug!("Builder service started");
    while let Some(command) = inbox.recv().await {
        // A dropped reply receiver only means the caller stopped waiting.
        match command {
            BuilderCommand::DropPayload {
                payload,
                pointer,
                bounds,
                reply,
            } => {
                let _ = reply.send(builder.drop_payload(&payload, pointer, bounds));
            }
            BuilderCommand::DropTemplate {
                template,
                pointer,
                bounds,
                reply,
            } => {
                let _ = reply.send(builder.drop_template(&template, pointer, bounds));
            }
            BuilderCommand::PointerDown {
                node_id,
                pointer,
                bounds,
                reply,
            } => {
                let _ = reply.send(builder.pointer_down(&node_id, pointer, bounds));
            }
            BuilderCommand::PointerMove {
                pointer,
                bounds,
                reply,
            } => {
                let _ = reply.send(builder.pointer_move(pointer, bounds));
            }
            BuilderCommand::PointerUp { reply } => {
                let _ = reply.send(builder.pointer_up());
            }
            BuilderCommand::RenameSelected { label, reply } => {
                let _ = reply.send(builder.rename_selected(label));
            }
            BuilderCommand::DeleteSelected { reply } => {
                let _ = reply.send(builder.delete_selected());
            }
            BuilderCommand::Clear { reply } => {
                builder.clear();
                let _ = reply.send(());
            }
            BuilderCommand::Run { reply } => {
                let _ = reply.send(builder.run());
            }
            BuilderCommand::Preview { reply } => {
                let _ = reply.send(builder.preview());
            }
            BuilderCommand::Snapshot { reply } => {
                let _ = reply.send(builder.snapshot());
            }
            BuilderCommand::Shutdown => break,
        }
    }
    // Whatever surface was feeding us is gone.
    builder.pointer_up();
    log::debug!("Builder service stopped");
    builder
}

/// Cloneable sender side of a [`BuilderService`]
#[derive(Clone)]
pub struct BuilderHandle {
    sender: mpsc::Sender<BuilderCommand>,
}

impl BuilderHandle {
    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> BuilderCommand) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(make(reply))
            .await
            .map_err(|_| FlowCanvasError::ServiceClosed)?;
        response.await.map_err(|_| FlowCanvasError::ServiceClosed)
    }

    pub async fn drop_payload(
        &self,
        payload: impl Into<String>,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Result<NodeId> {
        let payload = payload.into();
        self.request(|reply| BuilderCommand::DropPayload {
            payload,
            pointer,
            bounds,
            reply,
        })
        .await?
    }

    pub async fn drop_template(
        &self,
        template: StepTemplate,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Result<NodeId> {
        self.request(|reply| BuilderCommand::DropTemplate {
            template,
            pointer,
            bounds,
            reply,
        })
        .await?
    }

    pub async fn pointer_down(
        &self,
        node_id: impl Into<NodeId>,
        pointer: Point,
        bounds: SurfaceBounds,
    ) -> Result<bool> {
        let node_id = node_id.into();
        self.request(|reply| BuilderCommand::PointerDown {
            node_id,
            pointer,
            bounds,
            reply,
        })
        .await
    }

    pub async fn pointer_move(&self, pointer: Point, bounds: SurfaceBounds) -> Result<Option<Point>> {
        self.request(|reply| BuilderCommand::PointerMove {
            pointer,
            bounds,
            reply,
        })
        .await
    }

    pub async fn pointer_up(&self) -> Result<Option<NodeId>> {
        self.request(|reply| BuilderCommand::PointerUp { reply }).await
    }

    /// Release the surface subscription; ends any open drag
    pub async fn unmount_surface(&self) -> Result<Option<NodeId>> {
        self.pointer_up().await
    }

    pub async fn rename_selected(&self, label: impl Into<String>) -> Result<bool> {
        let label = label.into();
        self.request(|reply| BuilderCommand::RenameSelected { label, reply })
            .await
    }

    pub async fn delete_selected(&self) -> Result<Option<NodeId>> {
        self.request(|reply| BuilderCommand::DeleteSelected { reply })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.request(|reply| BuilderCommand::Clear { reply }).await
    }

    pub async fn run(&self) -> Result<Vec<PreviewEntry>> {
        self.request(|reply| BuilderCommand::Run { reply }).await
    }

    pub async fn preview(&self) -> Result<Vec<PreviewEntry>> {
        self.request(|reply| BuilderCommand::Preview { reply }).await
    }

    pub async fn snapshot(&self) -> Result<BuilderSnapshot> {
        self.request(|reply| BuilderCommand::Snapshot { reply }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIdGenerator;
    use crate::palette::{encode_payload, template_for};
    use crate::types::StepKind;

    const SURFACE: SurfaceBounds = SurfaceBounds::sized(400.0, 300.0);

    fn spawn() -> BuilderService {
        BuilderService::spawn(WorkflowBuilder::new().with_id_generator(SequentialIdGenerator::default()))
    }

    #[tokio::test]
    async fn test_commands_apply_in_order() {
        let service = spawn();
        let handle = service.handle();

        let payload = encode_payload(template_for(StepKind::Trigger)).unwrap();
        let first = handle
            .drop_payload(payload, Point::new(60.0, 60.0), SURFACE)
            .await
            .unwrap();
        let second = handle
            .drop_template(template_for(StepKind::Task).clone(), Point::new(200.0, 60.0), SURFACE)
            .await
            .unwrap();

        assert!(handle.pointer_down(&first, Point::new(60.0, 60.0), SURFACE).await.unwrap());
        let moved = handle
            .pointer_move(Point::new(90.0, 120.0), SURFACE)
            .await
            .unwrap();
        assert_eq!(moved, Some(Point::new(50.0, 104.0)));
        assert_eq!(handle.pointer_up().await.unwrap(), Some(first.clone()));

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.selected.as_deref(), Some(first.as_str()));
        assert_eq!(snapshot.dragging, None);

        let preview = handle.preview().await.unwrap();
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[1].label, "Task");

        handle.rename_selected("Webhook").await.unwrap();
        assert_eq!(handle.delete_selected().await.unwrap(), Some(first));

        let builder = service.shutdown().await.unwrap();
        assert_eq!(builder.nodes().len(), 1);
        assert_eq!(builder.nodes()[0].id, second);
        assert_eq!(builder.selected(), None);
    }

    #[tokio::test]
    async fn test_malformed_payload_reported() {
        let service = spawn();
        let handle = service.handle();

        let err = handle
            .drop_payload("{}", Point::new(60.0, 60.0), SURFACE)
            .await
            .unwrap_err();
        assert!(matches!(err, FlowCanvasError::MalformedPayload(_)));
        assert!(handle.snapshot().await.unwrap().nodes.is_empty());

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_handle_after_shutdown() {
        let service = spawn();
        let handle = service.handle();
        handle.clear().await.unwrap();

        service.shutdown().await.unwrap();
        assert!(matches!(handle.run().await, Err(FlowCanvasError::ServiceClosed)));
    }

    #[tokio::test]
    async fn test_unmount_releases_drag() {
        let service = spawn();
        let handle = service.handle();
        let id = handle
            .drop_template(template_for(StepKind::Delay).clone(), Point::new(150.0, 100.0), SURFACE)
            .await
            .unwrap();
        handle.pointer_down(&id, Point::new(150.0, 100.0), SURFACE).await.unwrap();

        assert_eq!(handle.unmount_surface().await.unwrap(), Some(id));
        assert_eq!(handle.snapshot().await.unwrap().dragging, None);
        service.shutdown().await.unwrap();
    }
}
