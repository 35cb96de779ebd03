//! Core types for the step canvas
//!
//! These types define step templates, placed nodes, and the partial
//! mutations applied to them.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Unique identifier for a placed node
pub type NodeId = String;

/// The kind of a workflow step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Starts the workflow
    Trigger,
    /// Performs work
    Task,
    /// Waits before continuing
    Delay,
    /// Branches on a condition
    Condition,
}

impl StepKind {
    /// All step kinds, in palette order
    pub const ALL: [StepKind; 4] = [
        StepKind::Trigger,
        StepKind::Task,
        StepKind::Delay,
        StepKind::Condition,
    ];

    /// Wire name (e.g. "trigger")
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Trigger => "trigger",
            StepKind::Task => "task",
            StepKind::Delay => "delay",
            StepKind::Condition => "condition",
        }
    }

    /// Capitalized name as shown in the inspector (e.g. "Trigger")
    pub fn display_name(&self) -> &'static str {
        match self {
            StepKind::Trigger => "Trigger",
            StepKind::Task => "Task",
            StepKind::Delay => "Delay",
            StepKind::Condition => "Condition",
        }
    }

    /// Parse a wire name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable catalog entry describing a creatable step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepTemplate {
    /// Step kind
    pub kind: StepKind,
    /// Default label for nodes created from this template
    pub label: Cow<'static, str>,
    /// Visual grouping (color/icon class); carries no behavior
    pub category: Cow<'static, str>,
}

impl StepTemplate {
    /// Create a template at compile time
    pub const fn new_static(kind: StepKind, label: &'static str, category: &'static str) -> Self {
        Self {
            kind,
            label: Cow::Borrowed(label),
            category: Cow::Borrowed(category),
        }
    }

    /// Create a template from owned strings
    pub fn new(kind: StepKind, label: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            kind,
            label: Cow::Owned(label.into()),
            category: Cow::Owned(category.into()),
        }
    }
}

/// A placed, positioned step on the surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier, fixed at creation
    pub id: NodeId,
    /// Step kind, copied from the template
    pub kind: StepKind,
    /// Editable label, initialized from the template
    pub label: String,
    /// Visual grouping, copied from the template
    pub category: String,
    /// Surface-local left edge
    pub x: f64,
    /// Surface-local top edge
    pub y: f64,
}

impl Node {
    /// Instantiate a template at an already clamped position
    pub fn from_template(id: impl Into<NodeId>, template: &StepTemplate, position: Point) -> Self {
        Self {
            id: id.into(),
            kind: template.kind,
            label: template.label.to_string(),
            category: template.category.to_string(),
            x: position.x,
            y: position.y,
        }
    }

    /// Top-left corner
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Partial mutation of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    /// New top-left corner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl NodePatch {
    /// Patch that only moves the node
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            label: None,
        }
    }

    /// Patch that only renames the node
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            position: None,
            label: Some(label.into()),
        }
    }

    /// Apply this patch to a node. Identity fields are never touched.
    pub fn apply_to(&self, node: &mut Node) {
        if let Some(position) = self.position {
            node.x = position.x;
            node.y = position.y;
        }
        if let Some(label) = &self.label {
            node.label.clone_from(label);
        }
    }
}
