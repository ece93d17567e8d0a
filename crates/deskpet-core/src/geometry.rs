//! Screen geometry: cursor points, window bounds, and coordinate spaces.
//!
//! Two coordinate spaces are in play. The capture service and the cursor
//! ground-truth query speak **physical** pixels; display-enumeration APIs
//! speak **logical** (scale-factor-divided) coordinates. [`CursorPoint`] is
//! physical, [`LogicalPoint`] is logical, and [`CursorPoint::to_logical`]
//! converts between them.
//!
//! Coordinates are `f64` throughout: relative motion deltas are fractional
//! under libinput, and `f64` subsumes integer physical positions exactly.

use serde::{Deserialize, Serialize};

/// A cursor position in physical screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorPoint {
    pub x: f64,
    pub y: f64,
}

impl CursorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts this physical point to logical coordinates by dividing by the
    /// window scale factor.
    pub fn to_logical(self, scale_factor: f64) -> LogicalPoint {
        LogicalPoint {
            x: self.x / scale_factor,
            y: self.y / scale_factor,
        }
    }
}

/// A point in logical (scale-factor-divided) coordinates, as consumed by the
/// display-enumeration API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

/// The inner size of a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle: a window's outer position plus inner size, or a
/// display's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds bounds from a window's outer position and inner size.
    pub fn from_position_and_size(position: CursorPoint, size: WindowSize) -> Self {
        Self {
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Containment test, half-open on both axes: `x ∈ [left, left+width)` and
    /// `y ∈ [top, top+height)`.
    pub fn contains(&self, point: &CursorPoint) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}
