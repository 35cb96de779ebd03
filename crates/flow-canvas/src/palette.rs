//! Palette of creatable steps and the drag payload codec
//!
//! The palette is a fixed catalog. A palette drag carries its template as a
//! small JSON object under [`PAYLOAD_MIME`](crate::constants::transfer::PAYLOAD_MIME):
//!
//! ```json
//! { "type": "trigger", "label": "Trigger", "color": "bg-emerald-500" }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::transfer;
use crate::error::{FlowCanvasError, Result};
use crate::types::{StepKind, StepTemplate};

/// The process-wide step catalog, in display order
pub static CATALOG: [StepTemplate; 4] = [
    StepTemplate::new_static(StepKind::Trigger, "Trigger", "bg-emerald-500"),
    StepTemplate::new_static(StepKind::Task, "Task", "bg-blue-500"),
    StepTemplate::new_static(StepKind::Delay, "Delay", "bg-amber-500"),
    StepTemplate::new_static(StepKind::Condition, "Condition", "bg-purple-500"),
];

/// All templates, in display order
pub fn templates() -> &'static [StepTemplate] {
    &CATALOG
}

/// Look up the catalog template for a kind
pub fn template_for(kind: StepKind) -> &'static StepTemplate {
    // CATALOG holds exactly one entry per kind, in StepKind::ALL order.
    &CATALOG[kind as usize]
}

/// Wire shape of a palette drag payload
#[derive(Debug, Serialize, Deserialize)]
struct DragPayload {
    #[serde(rename = "type")]
    kind: String,
    label: String,
    color: String,
}

/// Serialize a template for a palette drag start
pub fn encode_payload(template: &StepTemplate) -> Result<String> {
    let payload = DragPayload {
        kind: template.kind.as_str().to_string(),
        label: template.label.to_string(),
        color: template.category.to_string(),
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Everything a host sets on its data transfer when a palette drag starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DragStartData {
    pub mime: &'static str,
    pub payload: String,
    pub effect_allowed: &'static str,
}

/// Build the data transfer contents for dragging a palette item
pub fn drag_start(template: &StepTemplate) -> Result<DragStartData> {
    Ok(DragStartData {
        mime: transfer::PAYLOAD_MIME,
        payload: encode_payload(template)?,
        effect_allowed: transfer::EFFECT_ALLOWED,
    })
}

/// Parse a dropped payload into a template
///
/// Fails closed: anything that does not decode into a complete template
/// is a [`FlowCanvasError::MalformedPayload`].
pub fn decode_payload(raw: &str) -> Result<StepTemplate> {
    let payload: DragPayload = serde_json::from_str(raw)
        .map_err(|e| FlowCanvasError::malformed(e.to_string()))?;
    let kind = StepKind::parse(&payload.kind)
        .ok_or_else(|| FlowCanvasError::malformed(format!("unknown step type '{}'", payload.kind)))?;
    Ok(StepTemplate::new(kind, payload.label, payload.color))
}
