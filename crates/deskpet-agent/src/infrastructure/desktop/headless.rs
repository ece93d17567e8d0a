//! Headless desktop stand-in.
//!
//! Implements all three oracle traits over plain in-memory state so the agent
//! runs without a compositor: the cursor position is settable, opacity and
//! ignore-cursor-events are remembered, and a single fixed display is
//! reported. Integration tests drive it directly; the binary uses it as its
//! default desktop until a real windowing backend is wired in.

use std::sync::Mutex;

use async_trait::async_trait;
use deskpet_core::{CursorPoint, LogicalPoint, WindowBounds, WindowSize};
use tracing::info;

use super::{CursorOracle, DisplayOracle, Monitor, OverlayWindow, QueryError};

/// In-memory desktop with one display and one overlay window.
pub struct HeadlessDesktop {
    cursor: Mutex<CursorPoint>,
    window_position: CursorPoint,
    window_size: WindowSize,
    scale_factor: f64,
    display: Monitor,
    opacity: Mutex<f64>,
    ignore_cursor_events: Mutex<bool>,
}

impl HeadlessDesktop {
    pub fn new() -> Self {
        let scale_factor = 1.0;
        Self {
            cursor: Mutex::new(CursorPoint::new(0.0, 0.0)),
            window_position: CursorPoint::new(1600.0, 800.0),
            window_size: WindowSize {
                width: 300.0,
                height: 250.0,
            },
            scale_factor,
            display: Monitor {
                name: "headless-0".to_string(),
                bounds: WindowBounds::new(0.0, 0.0, 1920.0, 1080.0),
                scale_factor,
            },
            opacity: Mutex::new(1.0),
            ignore_cursor_events: Mutex::new(false),
        }
    }

    /// Overrides the overlay window's position and size.
    pub fn with_window(mut self, position: CursorPoint, size: WindowSize) -> Self {
        self.window_position = position;
        self.window_size = size;
        self
    }

    /// Moves the simulated OS cursor.
    pub fn set_cursor_position(&self, position: CursorPoint) {
        *self.cursor.lock().expect("lock poisoned") = position;
    }

    /// Last opacity applied via [`OverlayWindow::set_opacity`].
    pub fn opacity(&self) -> f64 {
        *self.opacity.lock().expect("lock poisoned")
    }

    /// Last flag applied via [`OverlayWindow::set_ignore_cursor_events`].
    pub fn ignores_cursor_events(&self) -> bool {
        *self.ignore_cursor_events.lock().expect("lock poisoned")
    }
}

impl Default for HeadlessDesktop {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CursorOracle for HeadlessDesktop {
    async fn cursor_position(&self) -> Result<CursorPoint, QueryError> {
        Ok(*self.cursor.lock().expect("lock poisoned"))
    }
}

#[async_trait]
impl OverlayWindow for HeadlessDesktop {
    async fn outer_position(&self) -> Result<CursorPoint, QueryError> {
        Ok(self.window_position)
    }

    async fn inner_size(&self) -> Result<WindowSize, QueryError> {
        Ok(self.window_size)
    }

    async fn scale_factor(&self) -> Result<f64, QueryError> {
        Ok(self.scale_factor)
    }

    async fn set_opacity(&self, opacity: f64) -> Result<(), QueryError> {
        info!(opacity, "overlay opacity changed");
        *self.opacity.lock().expect("lock poisoned") = opacity;
        Ok(())
    }

    async fn set_ignore_cursor_events(&self, ignore: bool) -> Result<(), QueryError> {
        info!(ignore, "overlay pointer pass-through changed");
        *self.ignore_cursor_events.lock().expect("lock poisoned") = ignore;
        Ok(())
    }
}

#[async_trait]
impl DisplayOracle for HeadlessDesktop {
    async fn available_displays(&self) -> Result<Vec<Monitor>, QueryError> {
        Ok(vec![self.display.clone()])
    }

    async fn display_from_point(
        &self,
        point: LogicalPoint,
    ) -> Result<Option<Monitor>, QueryError> {
        // Scale factor is 1.0 here, so logical and physical coincide.
        let point = CursorPoint::new(point.x, point.y);
        if self.display.bounds.contains(&point) {
            Ok(Some(self.display.clone()))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cursor_position_reflects_last_set() {
        let desktop = HeadlessDesktop::new();
        desktop.set_cursor_position(CursorPoint::new(42.0, 24.0));
        let pos = desktop.cursor_position().await.unwrap();
        assert_eq!(pos, CursorPoint::new(42.0, 24.0));
    }

    #[tokio::test]
    async fn test_opacity_and_ignore_are_remembered() {
        let desktop = HeadlessDesktop::new();
        desktop.set_opacity(0.0).await.unwrap();
        desktop.set_ignore_cursor_events(true).await.unwrap();
        assert_eq!(desktop.opacity(), 0.0);
        assert!(desktop.ignores_cursor_events());
    }

    #[tokio::test]
    async fn test_display_from_point_outside_bounds_is_none() {
        let desktop = HeadlessDesktop::new();
        let hit = desktop
            .display_from_point(LogicalPoint { x: 5000.0, y: 0.0 })
            .await
            .unwrap();
        assert!(hit.is_none());
    }
}
