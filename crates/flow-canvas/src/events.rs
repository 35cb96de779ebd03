//! Event types for streaming builder state changes
//!
//! Events are sent from the builder to the host (or any consumer) so a
//! presentation layer can re-render only what changed.

use serde::{Deserialize, Serialize};

use crate::preview::PreviewEntry;
use crate::types::{Node, NodeId};

/// Trait for sending builder events
///
/// This abstracts over the transport mechanism (UI channel, mpsc, etc.)
/// so the builder can be hosted in different contexts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be delivered (e.g., channel closed)
    fn send(&self, event: BuilderEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

impl EventError {
    pub fn channel_closed() -> Self {
        Self {
            message: "Channel closed".to_string(),
        }
    }
}

/// Events emitted by the builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BuilderEvent {
    /// A node was dropped onto the surface
    #[serde(rename_all = "camelCase")]
    NodeCreated { node: Node },

    /// A node's position changed during a reposition drag
    #[serde(rename_all = "camelCase")]
    NodeMoved { node_id: NodeId, x: f64, y: f64 },

    /// A node's label was edited
    #[serde(rename_all = "camelCase")]
    NodeRenamed { node_id: NodeId, label: String },

    /// A node was deleted
    #[serde(rename_all = "camelCase")]
    NodeDeleted { node_id: NodeId },

    /// Every node was removed
    #[serde(rename_all = "camelCase")]
    Cleared { removed: usize },

    /// The active node changed
    #[serde(rename_all = "camelCase")]
    SelectionChanged { node_id: Option<NodeId> },

    /// A reposition drag started
    #[serde(rename_all = "camelCase")]
    DragStarted { node_id: NodeId },

    /// A reposition drag ended
    #[serde(rename_all = "camelCase")]
    DragEnded { node_id: NodeId },

    /// The display-only run affordance was used
    #[serde(rename_all = "camelCase")]
    RunRequested { steps: Vec<PreviewEntry> },
}

/// Deliver an event, logging instead of propagating delivery failures
pub(crate) fn emit(sink: &dyn EventSink, event: BuilderEvent) {
    if let Err(e) = sink.send(event) {
        log::warn!("Dropped builder event: {}", e);
    }
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: BuilderEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: std::sync::Mutex<Vec<BuilderEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<BuilderEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: BuilderEvent) -> Result<(), EventError> {
        self.events
            .lock()
            .map_err(|_| EventError {
                message: "event buffer poisoned".to_string(),
            })?
            .push(event);
        Ok(())
    }
}

impl<S: EventSink + ?Sized> EventSink for std::sync::Arc<S> {
    fn send(&self, event: BuilderEvent) -> Result<(), EventError> {
        (**self).send(event)
    }
}

/// Event sink that forwards into a tokio unbounded channel
pub struct ChannelEventSink {
    sender: tokio::sync::mpsc::UnboundedSender<BuilderEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: tokio::sync::mpsc::UnboundedSender<BuilderEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelEventSink {
    fn send(&self, event: BuilderEvent) -> Result<(), EventError> {
        self.sender
            .send(event)
            .map_err(|_| EventError::channel_closed())
    }
}
