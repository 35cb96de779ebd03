//! Execution preview
//!
//! A read-only listing of the registry in insertion order. This is the
//! order steps *would* run in; nothing here executes, schedules, or
//! validates anything.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::copy;
use crate::registry::NodeRegistry;
use crate::types::StepKind;

/// One line of the preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    /// 1-based position in insertion order
    pub ordinal: usize,
    pub label: String,
    pub kind: StepKind,
}

impl fmt::Display for PreviewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.kind)
    }
}

/// Project the registry into preview entries
pub fn execution_preview(registry: &NodeRegistry) -> Vec<PreviewEntry> {
    registry
        .list()
        .iter()
        .enumerate()
        .map(|(idx, node)| PreviewEntry {
            ordinal: idx + 1,
            label: node.label.clone(),
            kind: node.kind,
        })
        .collect()
}

/// Render the preview as a numbered list, or the placeholder when empty
pub fn render_preview(entries: &[PreviewEntry]) -> String {
    if entries.is_empty() {
        return copy::EMPTY_PREVIEW.to_string();
    }
    entries
        .iter()
        .map(|e| format!("{}. {}", e.ordinal, e))
        .collect::<Vec<_>>()
        .join("\n")
}
