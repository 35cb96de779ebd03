//! Canvas configuration
//!
//! Layout numbers used by the drag controller. Every field falls back to
//! the values in [`crate::constants::defaults`].

use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::{FlowCanvasError, Result};
use crate::geometry::{Footprint, Point};

/// Layout configuration for a builder instance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    /// Minimum padding between a node and the surface edge
    pub inset: f64,
    /// Rendered node size
    pub footprint: Footprint,
    /// Added to a drop point before clamping so the node lands under the cursor
    pub centering_offset: Point,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            inset: defaults::INSET,
            footprint: Footprint::default(),
            centering_offset: Point::new(defaults::CENTERING_OFFSET_X, defaults::CENTERING_OFFSET_Y),
        }
    }
}

impl CanvasConfig {
    /// Parse a JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CanvasConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make clamping meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.inset.is_finite() || self.inset < 0.0 {
            return Err(FlowCanvasError::invalid_config(format!(
                "inset must be a non-negative number, got {}",
                self.inset
            )));
        }
        let Footprint { width, height } = self.footprint;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(FlowCanvasError::invalid_config(format!(
                "footprint must be positive, got {}x{}",
                width, height
            )));
        }
        if !(self.centering_offset.x.is_finite() && self.centering_offset.y.is_finite()) {
            return Err(FlowCanvasError::invalid_config("centering offset must be finite"));
        }
        Ok(())
    }
}
