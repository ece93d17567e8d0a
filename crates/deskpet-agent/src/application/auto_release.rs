//! AutoReleaseScheduler: synthesized, debounced key releases.
//!
//! Some keys never deliver a usable native release (CapsLock toggles instead
//! of releasing; on some platforms release delivery is unreliable across the
//! board). For those, a press immediately signals the sink and arms a timer
//! that signals the release later. Repeated presses of the same key reset the
//! timer, so the synthetic release fires a full delay after the *most recent*
//! press — a debounce, not a queue.
//!
//! Per-key lifecycle: Idle → Pressed → PendingAutoRelease → released by
//! expiry, or cancelled early by an explicit native release or a re-press
//! (which re-arms). Teardown cancels every pending timer so no release can
//! fire afterwards.
//!
//! The timer registry is the only shared mutable state: a map from key name
//! to a cancellable task handle, at most one entry per key. The only mutation
//! path is "look up, cancel-if-present, insert new".

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::InputSink;

/// CapsLock never delivers a native release; it always gets this fixed delay,
/// regardless of any configured platform override.
pub const CAPS_LOCK_RELEASE_DELAY: Duration = Duration::from_millis(100);

/// Schedules synthetic key releases on the shared Tokio runtime.
pub struct AutoReleaseScheduler {
    sink: Arc<dyn InputSink>,
    timers: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl AutoReleaseScheduler {
    pub fn new(sink: Arc<dyn InputSink>) -> Self {
        Self {
            sink,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Signals a press immediately and arms (or re-arms) the release timer.
    ///
    /// If a timer is already pending for `key` it is cancelled first, so the
    /// release fires `delay` after this call rather than after the original
    /// press. Exactly one press signal is emitted per call.
    pub fn press_with_auto_release(&self, key: &str, delay: Duration) {
        self.sink.press(key);

        let mut timers = self.timers.lock().expect("lock poisoned");
        if let Some(pending) = timers.remove(key) {
            pending.abort();
        }

        let sink = Arc::clone(&self.sink);
        let registry = Arc::clone(&self.timers);
        let owned_key = key.to_string();
        // Anchor the deadline at call time, not at the task's first poll, so
        // the release fires `delay` after this call as documented.
        let deadline = tokio::time::Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            sink.release(&owned_key);
            // Remove our own entry; a no-op if a re-press already replaced it.
            registry.lock().expect("lock poisoned").remove(&owned_key);
        });

        timers.insert(key.to_string(), handle);
    }

    /// Cancels the pending timer for `key`, if any. Called when an explicit
    /// native release arrives so the synthetic one is not emitted on top.
    pub fn cancel(&self, key: &str) {
        if let Some(pending) = self.timers.lock().expect("lock poisoned").remove(key) {
            pending.abort();
        }
    }

    /// Cancels and drains every pending timer. After this returns, no
    /// previously armed timer may signal a release.
    pub fn shutdown(&self) {
        for (_, pending) in self.timers.lock().expect("lock poisoned").drain() {
            pending.abort();
        }
    }

    /// Number of timers currently pending.
    pub fn pending_count(&self) -> usize {
        self.timers.lock().expect("lock poisoned").len()
    }
}
