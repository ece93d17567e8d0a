//! Mock event source for unit testing.
//!
//! Allows tests to inject synthetic [`DeviceEvent`]s without a running
//! capture service.

use std::sync::{Arc, Mutex};

use deskpet_core::DeviceEvent;
use tokio::sync::mpsc::{self, UnboundedSender};

use super::{CaptureError, DeviceEventSource};

/// A mock implementation of [`DeviceEventSource`] that allows tests to inject
/// events.
pub struct MockEventSource {
    sender: Arc<Mutex<Option<UnboundedSender<DeviceEvent>>>>,
    fail_on_start: bool,
}

impl MockEventSource {
    /// Creates a new mock event source.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
            fail_on_start: false,
        }
    }

    /// Creates a mock source whose `start()` fails with a seat-assignment
    /// error, for exercising the StartFailure path.
    pub fn failing() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
            fail_on_start: true,
        }
    }

    /// Injects a synthetic event, as if delivered by the capture service.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been called.
    pub fn inject_event(&self, event: DeviceEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("receiver has been dropped; call start() first");
        } else {
            panic!("MockEventSource::inject_event called before start()");
        }
    }
}

impl Default for MockEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEventSource for MockEventSource {
    fn start(&self) -> Result<mpsc::UnboundedReceiver<DeviceEvent>, CaptureError> {
        if self.fail_on_start {
            return Err(CaptureError::SeatAssignment(
                "injected failure".to_string(),
            ));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskpet_core::MouseMotion;

    #[tokio::test]
    async fn test_mock_source_starts_and_receives_events() {
        // Arrange
        let source = MockEventSource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.inject_event(DeviceEvent::KeyboardPress("A".to_string()));

        // Assert
        let event = rx.recv().await.expect("should receive event");
        assert_eq!(event, DeviceEvent::KeyboardPress("A".to_string()));
    }

    #[tokio::test]
    async fn test_mock_source_stop_closes_channel() {
        // Arrange
        let source = MockEventSource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.stop();

        // Assert – channel should be disconnected
        assert!(rx.recv().await.is_none(), "channel should close after stop()");
    }

    #[tokio::test]
    async fn test_mock_source_preserves_event_order() {
        // Arrange
        let source = MockEventSource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.inject_event(DeviceEvent::MousePress("Left".to_string()));
        source.inject_event(DeviceEvent::MouseMove(MouseMotion::Relative {
            dx: 1.0,
            dy: 1.0,
        }));
        source.inject_event(DeviceEvent::MouseRelease("Left".to_string()));

        // Assert
        assert_eq!(
            rx.recv().await.unwrap(),
            DeviceEvent::MousePress("Left".to_string())
        );
        assert!(matches!(rx.recv().await.unwrap(), DeviceEvent::MouseMove(_)));
        assert_eq!(
            rx.recv().await.unwrap(),
            DeviceEvent::MouseRelease("Left".to_string())
        );
    }

    #[test]
    fn test_failing_source_reports_seat_assignment() {
        let source = MockEventSource::failing();
        let result = source.start();
        assert!(matches!(result, Err(CaptureError::SeatAssignment(_))));
    }
}
