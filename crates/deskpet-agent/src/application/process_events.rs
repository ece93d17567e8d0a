//! DeviceEventProcessor: the orchestrator for the capture channel.
//!
//! One processor owns one [`CursorVirtualizer`], one [`AutoReleaseScheduler`]
//! and one [`HoverPassthroughController`], subscribes to the device-event
//! channel, and dispatches each event by kind:
//!
//! - keyboard events go through the normalizer, then press/release handling
//!   (CapsLock and unreliable-release platforms route through the
//!   auto-release scheduler);
//! - mouse button events are forwarded to the sink with a pressed flag;
//! - mouse move events go through the virtualizer and then the hover
//!   controller.
//!
//! Events are handled to completion in channel order on the processor task,
//! so the shared state needs no locking beyond the scheduler's timer map.

use std::sync::Arc;
use std::time::Duration;

use deskpet_core::{DeviceEvent, KeyNormalizer, KeySupportTable};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, trace};

use crate::infrastructure::capture::{CaptureError, DeviceEventSource};
use crate::infrastructure::desktop::{CursorOracle, OverlayWindow, QueryError};

use super::auto_release::{AutoReleaseScheduler, CAPS_LOCK_RELEASE_DELAY};
use super::hover::HoverPassthroughController;
use super::virtual_cursor::CursorVirtualizer;
use super::InputSink;

/// Error type for processor start.
///
/// Per the error policy this is the only failure that reaches a user-visible
/// surface; everything downstream of a successful start is absorbed locally.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The native capture service could not begin capturing.
    #[error("failed to start device capture: {0}")]
    Start(#[from] CaptureError),
    /// The initial ground-truth cursor query failed.
    #[error("could not query initial cursor position: {0}")]
    InitialPosition(#[from] QueryError),
}

impl ProcessorError {
    /// Short message suitable for the user-facing error surface (the UI shell
    /// localizes it; the log carries the diagnostic detail).
    pub fn user_message(&self) -> &'static str {
        match self {
            ProcessorError::Start(_) => {
                "Could not start input capture. Check that the capture service \
                 is running and you have permission to read input devices."
            }
            ProcessorError::InitialPosition(_) => {
                "Could not read the cursor position from the desktop."
            }
        }
    }
}

/// Behaviour knobs for the processor, derived from the loaded config.
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
    /// Support table for the canonical key vocabulary.
    pub support_table: KeySupportTable,
    /// Synthetic release delay for ordinary keys, when enabled.
    pub auto_release_delay: Duration,
    /// `true` on platforms where native key-release delivery is unreliable;
    /// every ordinary press then gets a synthetic release.
    pub synthetic_release: bool,
    /// Hide the overlay while the virtual cursor hovers over it.
    pub hide_on_hover: bool,
    /// Permanent pointer pass-through (the hover controller then leaves the
    /// ignore flag alone).
    pub pass_through: bool,
}

impl ProcessorOptions {
    /// Options with the platform default for synthetic releases.
    pub fn new(support_table: KeySupportTable, auto_release_delay: Duration) -> Self {
        Self {
            support_table,
            auto_release_delay,
            synthetic_release: cfg!(target_os = "windows"),
            hide_on_hover: false,
            pass_through: false,
        }
    }
}

/// The device-event processing use case.
pub struct DeviceEventProcessor {
    source: Arc<dyn DeviceEventSource>,
    sink: Arc<dyn InputSink>,
    normalizer: KeyNormalizer,
    virtualizer: CursorVirtualizer,
    scheduler: AutoReleaseScheduler,
    hover: HoverPassthroughController,
    auto_release_delay: Duration,
    synthetic_release: bool,
}

impl DeviceEventProcessor {
    /// Creates a processor instance. All mutable state (virtual cursor,
    /// timer registry, hover latch) is owned by this instance; independent
    /// processors never share it.
    pub fn new(
        source: Arc<dyn DeviceEventSource>,
        cursor_oracle: Arc<dyn CursorOracle>,
        window: Arc<dyn OverlayWindow>,
        sink: Arc<dyn InputSink>,
        options: ProcessorOptions,
    ) -> Self {
        Self {
            source,
            sink: Arc::clone(&sink),
            normalizer: KeyNormalizer::new(options.support_table),
            virtualizer: CursorVirtualizer::new(cursor_oracle),
            scheduler: AutoReleaseScheduler::new(sink),
            hover: HoverPassthroughController::new(
                window,
                options.hide_on_hover,
                options.pass_through,
            ),
            auto_release_delay: options.auto_release_delay,
            synthetic_release: options.synthetic_release,
        }
    }

    /// Seeds the virtual cursor from ground truth and asks the capture
    /// service to begin delivering events.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when either step fails. The caller shows
    /// [`ProcessorError::user_message`] and leaves the subscription inert; a
    /// start failure is recoverable and never crashes the host.
    pub async fn start(&mut self) -> Result<UnboundedReceiver<DeviceEvent>, ProcessorError> {
        self.virtualizer.initialize().await?;
        let receiver = self.source.start()?;
        info!(
            position = ?self.virtualizer.position(),
            "device event processor started"
        );
        Ok(receiver)
    }

    /// Consumes events until the channel closes, then drains the timer
    /// registry so no synthetic release fires after teardown.
    pub async fn run(&mut self, mut receiver: UnboundedReceiver<DeviceEvent>) {
        while let Some(event) = receiver.recv().await {
            self.handle_event(event).await;
        }
        debug!("event channel closed, draining pending release timers");
        self.scheduler.shutdown();
    }

    /// Dispatches a single device event.
    pub async fn handle_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::KeyboardPress(raw) => self.handle_key(&raw, true),
            DeviceEvent::KeyboardRelease(raw) => self.handle_key(&raw, false),
            DeviceEvent::MousePress(button) => self.sink.mouse_button(&button, true),
            DeviceEvent::MouseRelease(button) => self.sink.mouse_button(&button, false),
            DeviceEvent::MouseMove(motion) => {
                let position = self.virtualizer.on_move(motion).await;
                self.sink.mouse_move(position);
                self.hover.evaluate(&position).await;
            }
        }
    }

    fn handle_key(&self, raw: &str, pressed: bool) {
        let Some(key) = self.normalizer.normalize(raw) else {
            trace!(raw, "dropping unmapped key event");
            return;
        };

        // CapsLock toggles instead of releasing natively; both its press and
        // release events arm the fixed-delay synthetic release.
        if key == "CapsLock" {
            return self
                .scheduler
                .press_with_auto_release(&key, CAPS_LOCK_RELEASE_DELAY);
        }

        if pressed {
            if self.synthetic_release {
                self.scheduler
                    .press_with_auto_release(&key, self.auto_release_delay);
            } else {
                self.sink.press(&key);
            }
        } else {
            // An explicit native release cancels any pending synthetic one.
            self.scheduler.cancel(&key);
            self.sink.release(&key);
        }
    }

    /// Stops the capture source. The closed channel ends [`run`](Self::run),
    /// which drains the pending timers.
    pub fn stop(&self) {
        self.source.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::capture::mock::MockEventSource;
    use crate::infrastructure::desktop::headless::HeadlessDesktop;
    use deskpet_core::{CursorPoint, MouseMotion};
    use std::sync::Mutex;
    use tokio::task::yield_now;
    use tokio::time::advance;

    // ── Test doubles ──────────────────────────────────────────────────────────

    #[derive(Default)]
    struct RecordingSink {
        presses: Mutex<Vec<String>>,
        releases: Mutex<Vec<String>>,
        buttons: Mutex<Vec<(String, bool)>>,
        moves: Mutex<Vec<CursorPoint>>,
    }

    impl InputSink for RecordingSink {
        fn press(&self, key: &str) {
            self.presses.lock().unwrap().push(key.to_string());
        }
        fn release(&self, key: &str) {
            self.releases.lock().unwrap().push(key.to_string());
        }
        fn mouse_button(&self, button: &str, pressed: bool) {
            self.buttons.lock().unwrap().push((button.to_string(), pressed));
        }
        fn mouse_move(&self, position: CursorPoint) {
            self.moves.lock().unwrap().push(position);
        }
    }

    fn options(synthetic_release: bool) -> ProcessorOptions {
        ProcessorOptions {
            support_table: KeySupportTable::from_keys([
                "A", "CapsLock", "Control", "Fn", "Space",
            ]),
            auto_release_delay: Duration::from_millis(1000),
            synthetic_release,
            hide_on_hover: false,
            pass_through: false,
        }
    }

    fn make_processor(
        synthetic_release: bool,
    ) -> (DeviceEventProcessor, Arc<RecordingSink>, Arc<HeadlessDesktop>) {
        let desktop = Arc::new(HeadlessDesktop::new());
        let sink = Arc::new(RecordingSink::default());
        let source = Arc::new(MockEventSource::new());
        let processor = DeviceEventProcessor::new(
            source,
            Arc::clone(&desktop) as Arc<dyn CursorOracle>,
            Arc::clone(&desktop) as Arc<dyn OverlayWindow>,
            Arc::clone(&sink) as Arc<dyn InputSink>,
            options(synthetic_release),
        );
        (processor, sink, desktop)
    }

    async fn settle() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    // ── Keyboard dispatch ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_supported_key_press_and_release_pass_through() {
        let (mut processor, sink, _) = make_processor(false);

        processor
            .handle_event(DeviceEvent::KeyboardPress("A".to_string()))
            .await;
        processor
            .handle_event(DeviceEvent::KeyboardRelease("A".to_string()))
            .await;

        assert_eq!(sink.presses.lock().unwrap().as_slice(), ["A"]);
        assert_eq!(sink.releases.lock().unwrap().as_slice(), ["A"]);
    }

    #[tokio::test]
    async fn test_modifier_key_is_normalized_before_dispatch() {
        let (mut processor, sink, _) = make_processor(false);

        processor
            .handle_event(DeviceEvent::KeyboardPress("ControlLeft".to_string()))
            .await;

        assert_eq!(sink.presses.lock().unwrap().as_slice(), ["Control"]);
    }

    #[tokio::test]
    async fn test_unmapped_key_is_dropped_silently() {
        let (mut processor, sink, _) = make_processor(false);

        processor
            .handle_event(DeviceEvent::KeyboardPress("Unknown(464)".to_string()))
            .await;

        assert!(sink.presses.lock().unwrap().is_empty());
        assert!(sink.releases.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_capslock_uses_fixed_delay_even_with_synthetic_release() {
        // The configured ordinary-key delay is 1000ms; CapsLock must still
        // release after 100ms.
        let (mut processor, sink, _) = make_processor(true);

        processor
            .handle_event(DeviceEvent::KeyboardPress("CapsLock".to_string()))
            .await;
        assert_eq!(sink.presses.lock().unwrap().as_slice(), ["CapsLock"]);

        advance(Duration::from_millis(100)).await;
        settle().await;
        assert_eq!(sink.releases.lock().unwrap().as_slice(), ["CapsLock"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthetic_release_platform_arms_configured_delay() {
        let (mut processor, sink, _) = make_processor(true);

        processor
            .handle_event(DeviceEvent::KeyboardPress("A".to_string()))
            .await;
        assert_eq!(sink.presses.lock().unwrap().as_slice(), ["A"]);

        advance(Duration::from_millis(999)).await;
        settle().await;
        assert!(sink.releases.lock().unwrap().is_empty());

        advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(sink.releases.lock().unwrap().as_slice(), ["A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_native_release_cancels_pending_synthetic_release() {
        let (mut processor, sink, _) = make_processor(true);

        processor
            .handle_event(DeviceEvent::KeyboardPress("A".to_string()))
            .await;
        processor
            .handle_event(DeviceEvent::KeyboardRelease("A".to_string()))
            .await;

        advance(Duration::from_millis(2000)).await;
        settle().await;

        // Exactly one release: the native one.
        assert_eq!(sink.releases.lock().unwrap().as_slice(), ["A"]);
    }

    // ── Mouse dispatch ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_mouse_buttons_forward_with_pressed_flag() {
        let (mut processor, sink, _) = make_processor(false);

        processor
            .handle_event(DeviceEvent::MousePress("Left".to_string()))
            .await;
        processor
            .handle_event(DeviceEvent::MouseRelease("Left".to_string()))
            .await;

        assert_eq!(
            sink.buttons.lock().unwrap().as_slice(),
            [("Left".to_string(), true), ("Left".to_string(), false)]
        );
    }

    #[tokio::test]
    async fn test_mouse_move_publishes_virtual_position() {
        let (mut processor, sink, desktop) = make_processor(false);
        desktop.set_cursor_position(CursorPoint::new(100.0, 100.0));
        let receiver = processor.start().await.unwrap();
        drop(receiver);

        processor
            .handle_event(DeviceEvent::MouseMove(MouseMotion::Relative {
                dx: 5.0,
                dy: -5.0,
            }))
            .await;

        assert_eq!(
            sink.moves.lock().unwrap().as_slice(),
            [CursorPoint::new(105.0, 95.0)]
        );
    }

    // ── Start failure ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_start_failure_surfaces_capture_error() {
        let desktop = Arc::new(HeadlessDesktop::new());
        let sink = Arc::new(RecordingSink::default());
        let mut processor = DeviceEventProcessor::new(
            Arc::new(MockEventSource::failing()),
            Arc::clone(&desktop) as Arc<dyn CursorOracle>,
            Arc::clone(&desktop) as Arc<dyn OverlayWindow>,
            sink as Arc<dyn InputSink>,
            options(false),
        );

        let err = match processor.start().await {
            Err(e) => e,
            Ok(_) => panic!("expected start failure"),
        };
        assert!(matches!(err, ProcessorError::Start(_)));
        assert!(!err.user_message().is_empty());
    }
}
