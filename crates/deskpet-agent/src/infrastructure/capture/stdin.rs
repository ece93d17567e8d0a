//! Stdin event source for the headless binary.
//!
//! Reads one JSON [`DeviceEvent`] per line, the same `{kind, value}` shape
//! the native capture service emits over its pipe. Malformed lines are logged
//! and skipped so a glitchy producer cannot kill the subscription.

use std::sync::Mutex;

use deskpet_core::DeviceEvent;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{CaptureError, DeviceEventSource};

/// A [`DeviceEventSource`] backed by newline-delimited JSON on stdin.
pub struct StdinEventSource {
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl StdinEventSource {
    pub fn new() -> Self {
        Self {
            reader: Mutex::new(None),
        }
    }
}

impl Default for StdinEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceEventSource for StdinEventSource {
    fn start(&self) -> Result<mpsc::UnboundedReceiver<DeviceEvent>, CaptureError> {
        let mut reader = self.reader.lock().expect("lock poisoned");
        if reader.is_some() {
            return Err(CaptureError::AlreadyStarted);
        }

        let (tx, rx) = mpsc::unbounded_channel();

        *reader = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<DeviceEvent>(line) {
                            Ok(event) => {
                                if tx.send(event).is_err() {
                                    // Receiver gone; the processor shut down.
                                    break;
                                }
                            }
                            Err(e) => warn!("skipping malformed device event: {e}"),
                        }
                    }
                    Ok(None) => {
                        debug!("capture stream reached end of input");
                        break;
                    }
                    Err(e) => {
                        warn!("capture stream read error: {e}");
                        break;
                    }
                }
            }
        }));

        Ok(rx)
    }

    fn stop(&self) {
        // Aborting the reader drops the sender, which closes the channel.
        if let Some(handle) = self.reader.lock().expect("lock poisoned").take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_start_is_rejected() {
        let source = StdinEventSource::new();
        let _rx = source.start().expect("first start should succeed");
        assert!(matches!(source.start(), Err(CaptureError::AlreadyStarted)));
    }

    #[tokio::test]
    async fn test_stop_closes_channel() {
        let source = StdinEventSource::new();
        let mut rx = source.start().expect("start should succeed");
        source.stop();
        assert!(rx.recv().await.is_none(), "channel should close after stop()");
    }
}
