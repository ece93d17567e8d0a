//! HoverPassthroughController: hide the overlay under the virtual cursor.
//!
//! When `hide_on_hover` is enabled and the virtual cursor enters the overlay
//! window's bounds, the window surface is hidden (opacity 0) and — unless the
//! user already opted into permanent `pass_through` — pointer input is
//! forwarded to whatever is beneath. Leaving the bounds restores both.
//!
//! Evaluations are idempotent: the controller remembers the last containment
//! it applied and skips repeat applications, so a stream of identical move
//! events does not toggle window state back and forth.

use std::sync::Arc;

use deskpet_core::{CursorPoint, WindowBounds};
use tracing::{debug, warn};

use crate::infrastructure::desktop::OverlayWindow;

/// Derives opacity/pass-through decisions from the virtual cursor position.
pub struct HoverPassthroughController {
    window: Arc<dyn OverlayWindow>,
    hide_on_hover: bool,
    pass_through: bool,
    last_contained: Option<bool>,
}

impl HoverPassthroughController {
    pub fn new(window: Arc<dyn OverlayWindow>, hide_on_hover: bool, pass_through: bool) -> Self {
        Self {
            window,
            hide_on_hover,
            pass_through,
            last_contained: None,
        }
    }

    /// Evaluates the virtual cursor position against the current window
    /// bounds and applies opacity/pass-through side effects.
    ///
    /// A no-op unless `hide_on_hover` is enabled. Query failures are absorbed
    /// here: the evaluation is skipped without updating the remembered state,
    /// so the next move event retries.
    pub async fn evaluate(&mut self, position: &CursorPoint) {
        if !self.hide_on_hover {
            return;
        }

        let bounds = match self.query_bounds().await {
            Ok(bounds) => bounds,
            Err(e) => {
                warn!("window geometry query failed, skipping hover evaluation: {e}");
                return;
            }
        };

        let contained = bounds.contains(position);
        if self.last_contained == Some(contained) {
            return;
        }

        let opacity = if contained { 0.0 } else { 1.0 };
        if let Err(e) = self.window.set_opacity(opacity).await {
            warn!("failed to set overlay opacity: {e}");
            return;
        }

        if !self.pass_through {
            if let Err(e) = self.window.set_ignore_cursor_events(contained).await {
                warn!("failed to set pointer pass-through: {e}");
                return;
            }
        }

        debug!(contained, "hover state applied");
        self.last_contained = Some(contained);
    }

    async fn query_bounds(&self) -> Result<WindowBounds, crate::infrastructure::desktop::QueryError>
    {
        let position = self.window.outer_position().await?;
        let size = self.window.inner_size().await?;
        Ok(WindowBounds::from_position_and_size(position, size))
    }
}
