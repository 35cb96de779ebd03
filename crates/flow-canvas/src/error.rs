//! Error types for the flow canvas

use thiserror::Error;

use crate::types::NodeId;

/// Result type alias using FlowCanvasError
pub type Result<T> = std::result::Result<T, FlowCanvasError>;

/// Errors that can occur in the flow canvas
///
/// Stale node references and out-of-bounds geometry are not errors: the
/// former degrade to a no-op, the latter are clamped.
#[derive(Debug, Error)]
pub enum FlowCanvasError {
    /// A create payload was missing fields or named an unknown step kind
    #[error("Malformed step payload: {0}")]
    MalformedPayload(String),

    /// A node with this ID is already registered
    #[error("Duplicate node ID: {0}")]
    DuplicateId(NodeId),

    /// Canvas configuration is unusable
    #[error("Invalid canvas config: {0}")]
    InvalidConfig(String),

    /// The builder service task has stopped
    #[error("Builder service closed")]
    ServiceClosed,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowCanvasError {
    /// Create a malformed payload error with a message
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    /// Create an invalid config error with a message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
