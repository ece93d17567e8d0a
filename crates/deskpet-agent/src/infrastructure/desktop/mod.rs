//! Desktop oracles: async queries against the window system.
//!
//! Three concerns, three traits:
//!
//! - [`CursorOracle`] – ground-truth cursor position in physical coordinates.
//!   Idempotent and cheap; the virtualizer queries it on every move event.
//! - [`OverlayWindow`] – the overlay's own geometry plus its opacity and
//!   pointer-pass-through knobs.
//! - [`DisplayOracle`] – display enumeration in logical coordinates.
//!
//! Production implementations wrap the compositor/windowing API; tests and
//! the headless binary use [`headless::HeadlessDesktop`]. Per the error
//! policy, callers absorb [`QueryError`] locally (cached value or fallback
//! entry) — the only query failure that escapes is the initial cursor query
//! during processor start.

use async_trait::async_trait;
use deskpet_core::{CursorPoint, LogicalPoint, WindowBounds, WindowSize};

pub mod headless;

/// Error type for desktop queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// The windowing backend reported a failure.
    #[error("desktop query failed: {0}")]
    Backend(String),
    /// The query succeeded but produced no result.
    #[error("desktop query returned no result")]
    Unavailable,
}

/// Ground-truth cursor position query.
#[async_trait]
pub trait CursorOracle: Send + Sync {
    /// Returns the OS cursor position in physical coordinates.
    async fn cursor_position(&self) -> Result<CursorPoint, QueryError>;
}

/// The overlay window's geometry and presentation knobs.
#[async_trait]
pub trait OverlayWindow: Send + Sync {
    /// Outer position of the window in physical coordinates.
    async fn outer_position(&self) -> Result<CursorPoint, QueryError>;

    /// Inner (content) size of the window in physical coordinates.
    async fn inner_size(&self) -> Result<WindowSize, QueryError>;

    /// The window's scale factor (physical / logical).
    async fn scale_factor(&self) -> Result<f64, QueryError>;

    /// Sets the window surface opacity; `0.0` hides it, `1.0` is the default.
    async fn set_opacity(&self, opacity: f64) -> Result<(), QueryError>;

    /// When `true`, pointer input passes through to windows beneath.
    async fn set_ignore_cursor_events(&self, ignore: bool) -> Result<(), QueryError>;
}

/// A connected display as reported by the enumeration API.
#[derive(Debug, Clone, PartialEq)]
pub struct Monitor {
    pub name: String,
    /// Display bounds in logical coordinates.
    pub bounds: WindowBounds,
    pub scale_factor: f64,
}

/// Display enumeration in logical coordinates.
#[async_trait]
pub trait DisplayOracle: Send + Sync {
    /// Lists every connected display.
    async fn available_displays(&self) -> Result<Vec<Monitor>, QueryError>;

    /// Resolves the display containing the given logical point, if any.
    async fn display_from_point(&self, point: LogicalPoint)
        -> Result<Option<Monitor>, QueryError>;
}
