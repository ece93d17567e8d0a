//! # deskpet-core
//!
//! Shared domain library for DeskPet Overlay containing the device-event wire
//! model, screen geometry, and the canonical key vocabulary with its
//! normalization rules.
//!
//! This crate is used by the agent (and any future UI shell). It has zero
//! dependencies on OS APIs, async runtimes, or window-system libraries.
//!
//! # Architecture overview
//!
//! DeskPet Overlay is a desktop companion: an always-on-top overlay window
//! whose "pet" mirrors the user's typing and mouse activity. A native
//! input-capture service watches the real devices and pushes one tagged JSON
//! event per message over a single ordered channel. This crate defines:
//!
//! - **`event`** – The wire model for those messages: a closed
//!   [`DeviceEvent`] enum matching the capture service's `{kind, value}`
//!   JSON, so adding an event kind is a compile-time-checked change.
//!
//! - **`geometry`** – Cursor points, window bounds, and the physical/logical
//!   coordinate conversion used when talking to display-enumeration APIs.
//!
//! - **`keymap`** – The canonical key vocabulary the pet artwork understands,
//!   and the normalizer that folds raw capture-service key names (e.g.
//!   `ControlLeft`, `F13`) down to canonical keys (`Control`, `Fn`).

pub mod event;
pub mod geometry;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `deskpet_core::DeviceEvent` instead of `deskpet_core::event::DeviceEvent`.
pub use event::{DeviceEvent, MouseMotion};
pub use geometry::{CursorPoint, LogicalPoint, WindowBounds, WindowSize};
pub use keymap::{KeyNormalizer, KeySupportTable, MODIFIER_FAMILIES};
