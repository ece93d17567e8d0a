//! Application layer use cases for the agent.
//!
//! Use cases in this layer orchestrate domain objects from `deskpet-core` and
//! depend only on abstractions (traits) over the desktop and the capture
//! channel, so infrastructure can be swapped without changing this code.
//!
//! # Sub-modules
//!
//! - **`process_events`** – The orchestrator: subscribes to the device-event
//!   channel and dispatches each event to the components below. Runs on
//!   every keystroke and mouse movement.
//!
//! - **`virtual_cursor`** – Reconciles a drift-corrected virtual cursor
//!   position from mixed absolute/relative move events and periodic
//!   ground-truth queries.
//!
//! - **`auto_release`** – Synthesizes debounced release events for keys whose
//!   native release delivery is unreliable.
//!
//! - **`hover`** – Hides the overlay and toggles pointer pass-through while
//!   the virtual cursor hovers over it.
//!
//! - **`locate_monitor`** – Resolves which display contains a point, with the
//!   first-display fallback.

pub mod auto_release;
pub mod hover;
pub mod locate_monitor;
pub mod process_events;
pub mod virtual_cursor;

use deskpet_core::CursorPoint;

/// Consumer of resolved input state — in the full app, the pet renderer.
///
/// Methods are synchronous signals; implementations must be cheap and
/// non-blocking (the auto-release timers call them from timer tasks).
pub trait InputSink: Send + Sync {
    /// A canonical key went down.
    fn press(&self, key: &str);

    /// A canonical key came up (native or synthesized).
    fn release(&self, key: &str);

    /// A mouse button changed state.
    fn mouse_button(&self, button: &str, pressed: bool);

    /// The virtual cursor moved to a new resolved position.
    fn mouse_move(&self, position: CursorPoint);
}
