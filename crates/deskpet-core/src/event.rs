//! Device-event wire model.
//!
//! The native input-capture service emits one JSON object per event on a
//! single ordered channel:
//!
//! ```json
//! {"kind":"MousePress","value":"Left"}
//! {"kind":"MouseMove","value":{"dx":3.5,"dy":-1.0}}
//! {"kind":"MouseMove","value":{"x":812.0,"y":400.0}}
//! {"kind":"KeyboardPress","value":"ControlLeft"}
//! ```
//!
//! [`DeviceEvent`] mirrors that shape exactly via serde's adjacently-tagged
//! representation. The enum is closed and every dispatch site matches it
//! exhaustively, so introducing a new event kind forces every handler to be
//! revisited at compile time.

use serde::{Deserialize, Serialize};

/// A single raw device event delivered by the native capture service.
///
/// Exactly one variant per message; there are no partial or combined events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum DeviceEvent {
    /// A mouse button was pressed. The payload is the button name as reported
    /// by the capture service (`"Left"`, `"Right"`, `"Middle"`, ...).
    MousePress(String),
    /// A mouse button was released.
    MouseRelease(String),
    /// The mouse moved, either by a relative delta or to an absolute point.
    MouseMove(MouseMotion),
    /// A keyboard key was pressed. The payload is the raw key name (e.g.
    /// `"ControlLeft"`, `"F13"`, `"A"`), not yet normalized.
    KeyboardPress(String),
    /// A keyboard key was released.
    KeyboardRelease(String),
}

/// The payload of a [`DeviceEvent::MouseMove`].
///
/// Relative deltas come from low-level pointer motion (fractional under
/// libinput); absolute points come from tablet-style or warped motion. The
/// untagged representation distinguishes them by field names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MouseMotion {
    /// The cursor moved to an absolute position in physical coordinates.
    Absolute { x: f64, y: f64 },
    /// The cursor moved by a delta in physical coordinates.
    Relative { dx: f64, dy: f64 },
}
