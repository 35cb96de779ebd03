//! Surface geometry and the clamping policy
//!
//! All positions handed to the registry pass through [`clamp_position`],
//! which keeps a node's footprint inside the surface with at least `inset`
//! of padding on every side.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// A 2D coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Rendered size of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Footprint {
    fn default() -> Self {
        Self::new(defaults::NODE_WIDTH, defaults::NODE_HEIGHT)
    }
}

/// Bounding rectangle of the surface, in the same space as pointer events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Top-left corner of the surface
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl SurfaceBounds {
    pub const fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Surface anchored at (0, 0)
    pub const fn sized(width: f64, height: f64) -> Self {
        Self::new(Point::new(0.0, 0.0), width, height)
    }

    /// Convert a pointer coordinate to surface-local space
    pub fn to_local(&self, pointer: Point) -> Point {
        pointer - self.origin
    }
}

/// Clamp one axis: `max(inset, min(raw, extent - footprint - inset))`
///
/// `max` is applied last, so a surface too small to hold the footprint
/// pins the node at `inset`.
pub fn clamp_axis(raw: f64, extent: f64, footprint: f64, inset: f64) -> f64 {
    inset.max(raw.min(extent - footprint - inset))
}

/// Clamp a surface-local position on both axes
pub fn clamp_position(
    raw: Point,
    bounds: &SurfaceBounds,
    footprint: Footprint,
    inset: f64,
) -> Point {
    Point::new(
        clamp_axis(raw.x, bounds.width, footprint.width, inset),
        clamp_axis(raw.y, bounds.height, footprint.height, inset),
    )
}
