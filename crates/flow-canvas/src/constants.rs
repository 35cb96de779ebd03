//! Canvas-wide constants
//!
//! Single source of truth for layout numbers and user-facing copy.

/// Default geometry for placed nodes
pub mod defaults {
    /// Minimum distance between a node and any surface edge
    pub const INSET: f64 = 8.0;
    /// Width of a rendered node
    pub const NODE_WIDTH: f64 = 100.0;
    /// Height of a rendered node
    pub const NODE_HEIGHT: f64 = 40.0;
    /// Horizontal shift applied to a drop point so the node lands roughly centered
    pub const CENTERING_OFFSET_X: f64 = -40.0;
    /// Vertical shift applied to a drop point
    pub const CENTERING_OFFSET_Y: f64 = -16.0;
}

/// Drag-and-drop transfer settings
pub mod transfer {
    /// MIME type carried by palette drags
    pub const PAYLOAD_MIME: &str = "application/json";
    /// Effect the palette advertises on drag start
    pub const EFFECT_ALLOWED: &str = "copy";
}

/// Placeholder and help text shown by the builder panels
pub mod copy {
    /// Shown on the surface while it holds no nodes
    pub const EMPTY_SURFACE: &str = "Drag steps here to begin your workflow";
    /// Shown by the inspector when nothing is selected
    pub const NOTHING_SELECTED: &str = "Select a node on the canvas to edit its properties.";
    /// Shown by the execution preview while it is empty
    pub const EMPTY_PREVIEW: &str = "Add steps to see the execution order.";
    /// Tips listed under the palette
    pub const TIPS: [&str; 3] = [
        "Start with a Trigger step",
        "Add Tasks, Delays, or Conditions",
        "Drag nodes to reposition on the canvas",
    ];
}

/// Service configuration
pub mod service {
    /// Capacity of the builder command queue
    pub const COMMAND_QUEUE_CAPACITY: usize = 256;
}
