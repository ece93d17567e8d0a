//! MonitorResolver: which display is the cursor on?
//!
//! A small fallback utility. The point of interest (given, or a fresh
//! ground-truth cursor query) is converted to logical coordinates via the
//! overlay window's scale factor and looked up against the display list. If
//! no display claims the point, the first available display stands in; if
//! there are no displays at all, the answer is `None` and the invoking flow
//! must treat that as a no-op — never as a failure.

use std::sync::Arc;

use deskpet_core::CursorPoint;
use tracing::debug;

use crate::infrastructure::desktop::{CursorOracle, DisplayOracle, Monitor, OverlayWindow};

/// Resolves the display containing a given point.
pub struct MonitorResolver {
    cursor: Arc<dyn CursorOracle>,
    window: Arc<dyn OverlayWindow>,
    displays: Arc<dyn DisplayOracle>,
}

impl MonitorResolver {
    pub fn new(
        cursor: Arc<dyn CursorOracle>,
        window: Arc<dyn OverlayWindow>,
        displays: Arc<dyn DisplayOracle>,
    ) -> Self {
        Self {
            cursor,
            window,
            displays,
        }
    }

    /// Resolves the display containing `point` (or the current cursor
    /// position when `point` is `None`).
    ///
    /// Every query failure along the way degrades to `None`.
    pub async fn resolve(&self, point: Option<CursorPoint>) -> Option<Monitor> {
        let point = match point {
            Some(p) => p,
            None => match self.cursor.cursor_position().await {
                Ok(p) => p,
                Err(e) => {
                    debug!("cursor query failed while resolving monitor: {e}");
                    return None;
                }
            },
        };

        let scale_factor = match self.window.scale_factor().await {
            Ok(s) => s,
            Err(e) => {
                debug!("scale factor query failed while resolving monitor: {e}");
                return None;
            }
        };
        let logical = point.to_logical(scale_factor);

        match self.displays.display_from_point(logical).await {
            Ok(Some(monitor)) => Some(monitor),
            Ok(None) | Err(_) => {
                // Fall back to the first available display.
                let displays = self.displays.available_displays().await.ok()?;
                displays.into_iter().next()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::desktop::QueryError;
    use async_trait::async_trait;
    use deskpet_core::{LogicalPoint, WindowBounds, WindowSize};

    // ── Test doubles ──────────────────────────────────────────────────────────

    struct FixedCursor(Result<CursorPoint, QueryError>);

    #[async_trait]
    impl CursorOracle for FixedCursor {
        async fn cursor_position(&self) -> Result<CursorPoint, QueryError> {
            self.0.clone()
        }
    }

    struct ScaledWindow(f64);

    #[async_trait]
    impl OverlayWindow for ScaledWindow {
        async fn outer_position(&self) -> Result<CursorPoint, QueryError> {
            Ok(CursorPoint::new(0.0, 0.0))
        }
        async fn inner_size(&self) -> Result<WindowSize, QueryError> {
            Ok(WindowSize {
                width: 0.0,
                height: 0.0,
            })
        }
        async fn scale_factor(&self) -> Result<f64, QueryError> {
            Ok(self.0)
        }
        async fn set_opacity(&self, _opacity: f64) -> Result<(), QueryError> {
            Ok(())
        }
        async fn set_ignore_cursor_events(&self, _ignore: bool) -> Result<(), QueryError> {
            Ok(())
        }
    }

    struct FixedDisplays {
        displays: Vec<Monitor>,
    }

    #[async_trait]
    impl DisplayOracle for FixedDisplays {
        async fn available_displays(&self) -> Result<Vec<Monitor>, QueryError> {
            Ok(self.displays.clone())
        }

        async fn display_from_point(
            &self,
            point: LogicalPoint,
        ) -> Result<Option<Monitor>, QueryError> {
            let as_point = CursorPoint::new(point.x, point.y);
            Ok(self
                .displays
                .iter()
                .find(|m| m.bounds.contains(&as_point))
                .cloned())
        }
    }

    fn monitor(name: &str, x: f64, width: f64) -> Monitor {
        Monitor {
            name: name.to_string(),
            bounds: WindowBounds::new(x, 0.0, width, 1080.0),
            scale_factor: 1.0,
        }
    }

    fn resolver(cursor: FixedCursor, scale: f64, displays: Vec<Monitor>) -> MonitorResolver {
        MonitorResolver::new(
            Arc::new(cursor),
            Arc::new(ScaledWindow(scale)),
            Arc::new(FixedDisplays { displays }),
        )
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolves_display_containing_point() {
        let r = resolver(
            FixedCursor(Ok(CursorPoint::new(0.0, 0.0))),
            1.0,
            vec![monitor("left", 0.0, 1920.0), monitor("right", 1920.0, 1920.0)],
        );

        let hit = r.resolve(Some(CursorPoint::new(2000.0, 10.0))).await;
        assert_eq!(hit.unwrap().name, "right");
    }

    #[tokio::test]
    async fn test_missing_point_uses_cursor_query() {
        let r = resolver(
            FixedCursor(Ok(CursorPoint::new(100.0, 100.0))),
            1.0,
            vec![monitor("only", 0.0, 1920.0)],
        );

        let hit = r.resolve(None).await;
        assert_eq!(hit.unwrap().name, "only");
    }

    #[tokio::test]
    async fn test_scale_factor_converts_to_logical_space() {
        // Physical (3000, 10) at scale 2.0 is logical (1500, 5): on "left".
        let r = resolver(
            FixedCursor(Ok(CursorPoint::new(0.0, 0.0))),
            2.0,
            vec![monitor("left", 0.0, 1920.0), monitor("right", 1920.0, 1920.0)],
        );

        let hit = r.resolve(Some(CursorPoint::new(3000.0, 10.0))).await;
        assert_eq!(hit.unwrap().name, "left");
    }

    #[tokio::test]
    async fn test_no_containing_display_falls_back_to_first() {
        let r = resolver(
            FixedCursor(Ok(CursorPoint::new(0.0, 0.0))),
            1.0,
            vec![monitor("first", 0.0, 1920.0), monitor("second", 1920.0, 1920.0)],
        );

        let hit = r.resolve(Some(CursorPoint::new(-500.0, -500.0))).await;
        assert_eq!(hit.unwrap().name, "first");
    }

    #[tokio::test]
    async fn test_empty_display_list_resolves_to_none() {
        let r = resolver(FixedCursor(Ok(CursorPoint::new(0.0, 0.0))), 1.0, vec![]);

        assert!(r.resolve(Some(CursorPoint::new(10.0, 10.0))).await.is_none());
    }

    #[tokio::test]
    async fn test_cursor_query_failure_resolves_to_none() {
        let r = resolver(
            FixedCursor(Err(QueryError::Unavailable)),
            1.0,
            vec![monitor("only", 0.0, 1920.0)],
        );

        assert!(r.resolve(None).await.is_none());
    }
}
