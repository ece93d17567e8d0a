//! CursorVirtualizer: a drift-corrected virtual cursor position.
//!
//! The capture service's move events are a mix of absolute points and
//! relative deltas, and delivery is lossy at low sampling rates — deltas
//! accumulate error. The OS cursor query is authoritative whenever it has
//! actually changed; when it is stale (the cursor only moved via synthetic or
//! relative events, e.g. while the pointer is warped or outside sampling
//! range), deltas are trusted instead.
//!
//! Reconciliation on every move event:
//!
//! 1. Re-query ground truth.
//! 2. If the fresh value differs from the last cached query, **snap** the
//!    virtual position to it (native movement wins over any queued deltas)
//!    and update the cache.
//! 3. Otherwise apply the incoming motion: add a relative delta, or replace
//!    outright with an absolute point.
//!
//! This also makes the cooperative-interleaving race safe: a move event that
//! mutates the virtual position while another handler's query is in flight is
//! still resolved correctly by the next query's difference check.
//!
//! All state lives on the instance — one virtualizer per processor, never a
//! process-wide singleton, so independent processors (e.g. under test) do not
//! share state.

use std::sync::Arc;

use deskpet_core::{CursorPoint, MouseMotion};
use tracing::debug;

use crate::infrastructure::desktop::{CursorOracle, QueryError};

/// Maintains the reconciled virtual cursor position.
pub struct CursorVirtualizer {
    oracle: Arc<dyn CursorOracle>,
    virtual_pos: CursorPoint,
    last_native_pos: CursorPoint,
}

impl CursorVirtualizer {
    /// Creates a virtualizer; call [`initialize`](Self::initialize) before
    /// processing any move event.
    pub fn new(oracle: Arc<dyn CursorOracle>) -> Self {
        Self {
            oracle,
            virtual_pos: CursorPoint::new(0.0, 0.0),
            last_native_pos: CursorPoint::new(0.0, 0.0),
        }
    }

    /// Performs the one-time ground-truth query and seeds both the virtual
    /// position and the native-position cache from it.
    ///
    /// # Errors
    ///
    /// Propagates [`QueryError`]: there is no cached value to fall back to
    /// yet, so the caller surfaces this as a start failure.
    pub async fn initialize(&mut self) -> Result<(), QueryError> {
        let pos = self.oracle.cursor_position().await?;
        self.virtual_pos = pos;
        self.last_native_pos = pos;
        Ok(())
    }

    /// Resolves one move event and returns the new virtual position.
    ///
    /// A failed ground-truth query is absorbed here: the cached native
    /// position stands in, which means the incoming motion is applied as if
    /// the native cursor had not moved.
    pub async fn on_move(&mut self, motion: MouseMotion) -> CursorPoint {
        let fresh = match self.oracle.cursor_position().await {
            Ok(pos) => pos,
            Err(e) => {
                debug!("ground-truth cursor query failed, using cached position: {e}");
                self.last_native_pos
            }
        };

        if fresh != self.last_native_pos {
            // Native movement wins over whatever this event carried.
            self.virtual_pos = fresh;
            self.last_native_pos = fresh;
        } else {
            match motion {
                MouseMotion::Relative { dx, dy } => {
                    self.virtual_pos.x += dx;
                    self.virtual_pos.y += dy;
                }
                MouseMotion::Absolute { x, y } => {
                    self.virtual_pos = CursorPoint::new(x, y);
                }
            }
        }

        self.virtual_pos
    }

    /// The current virtual position.
    pub fn position(&self) -> CursorPoint {
        self.virtual_pos
    }
}
