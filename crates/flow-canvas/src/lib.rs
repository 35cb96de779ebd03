//! Flow Canvas - state core for a drag-and-drop workflow step builder
//!
//! This crate holds everything a visual step builder needs that is not
//! rendering: the placed-node model, the two pointer interactions, single
//! selection, clamping to the surface, and the derived execution order.
//! It supports:
//!
//! - Create-on-drop from a fixed palette of step templates
//! - Reposition-by-drag with a recorded grab offset
//! - Bounds clamping with a configurable footprint and inset
//! - An inspector for renaming and deleting the selected node
//! - A display-only execution preview in insertion order
//!
//! # Architecture
//!
//! - `NodeRegistry`: ordered node list; insertion order is execution order
//! - `DragController`: Idle/Repositioning state machine over the registry
//! - `WorkflowBuilder`: facade with one method per host input event
//! - `SurfaceSubscription`: scoped pointer routing for a mounted surface
//! - `BuilderService`: single-owner command queue for threaded hosts
//! - `EventSink`: generic state-change streaming (not tied to any UI toolkit)
//!
//! Nothing here executes steps, validates connectivity, or persists state.

pub mod builder;
pub mod config;
pub mod constants;
pub mod drag;
pub mod error;
pub mod events;
pub mod geometry;
pub mod id;
pub mod inspector;
pub mod palette;
pub mod preview;
pub mod registry;
pub mod selection;
pub mod service;
pub mod surface;
pub mod types;

// Re-export key types
pub use builder::{BuilderSnapshot, WorkflowBuilder};
pub use config::CanvasConfig;
pub use drag::{DragController, DragState, RepositionSession};
pub use error::{FlowCanvasError, Result};
pub use events::{BuilderEvent, ChannelEventSink, EventError, EventSink, NullEventSink, VecEventSink};
pub use geometry::{clamp_axis, clamp_position, Footprint, Point, SurfaceBounds};
pub use id::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use inspector::InspectorView;
pub use preview::PreviewEntry;
pub use registry::NodeRegistry;
pub use selection::Selection;
pub use service::{BuilderHandle, BuilderService};
pub use surface::SurfaceSubscription;
pub use types::{Node, NodeId, NodePatch, StepKind, StepTemplate};
