//! Device-event capture infrastructure.
//!
//! The native input-capture service owns the OS-level hooks (libinput seat on
//! Linux, low-level hooks elsewhere) and delivers one tagged JSON event per
//! message over a single ordered channel. This module abstracts that channel
//! behind the [`DeviceEventSource`] trait so the application layer never sees
//! the transport.
//!
//! # Testability
//!
//! [`mock::MockEventSource`] lets unit and integration tests inject synthetic
//! events without a running capture service; [`stdin::StdinEventSource`] reads
//! newline-delimited JSON from stdin for the headless binary.

use deskpet_core::DeviceEvent;
use tokio::sync::mpsc;

pub mod mock;
pub mod stdin;

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The capture service could not attach to the input seat. The classic
    /// cause on Linux is the user not being in the `input` group.
    #[error("failed to assign input seat: {0}")]
    SeatAssignment(String),
    /// `start()` was called while the source was already running.
    #[error("capture source already started")]
    AlreadyStarted,
    /// The capture backend is missing or refused the connection.
    #[error("capture backend unavailable: {0}")]
    Backend(String),
}

/// Trait abstracting device-event production.
///
/// `start` hands back the receiving end of the event channel; the channel
/// stays open until `stop` is called or the producer goes away.
pub trait DeviceEventSource: Send + Sync {
    /// Starts the source and returns the receiver for captured events.
    fn start(&self) -> Result<mpsc::UnboundedReceiver<DeviceEvent>, CaptureError>;

    /// Stops the source and closes the event channel.
    fn stop(&self);
}
