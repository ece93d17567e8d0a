//! DeskPet Overlay agent entry point.
//!
//! Wires together the infrastructure and starts the Tokio async runtime.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ storage::config::load()   -- user settings + key vocabulary
//!  └─ HeadlessDesktop           -- cursor/window/display oracles
//!  └─ StdinEventSource          -- NDJSON device events from the capture pipe
//!  └─ DeviceEventProcessor      -- Tokio task consuming the event channel
//! ```
//!
//! The headless desktop stands in for a real compositor backend; the capture
//! service writes one JSON event per line to our stdin.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use deskpet_agent::application::locate_monitor::MonitorResolver;
use deskpet_agent::application::process_events::{DeviceEventProcessor, ProcessorOptions};
use deskpet_agent::application::InputSink;
use deskpet_agent::infrastructure::capture::stdin::StdinEventSource;
use deskpet_agent::infrastructure::capture::DeviceEventSource;
use deskpet_agent::infrastructure::desktop::headless::HeadlessDesktop;
use deskpet_agent::infrastructure::desktop::{CursorOracle, DisplayOracle, OverlayWindow};
use deskpet_agent::infrastructure::storage::config;
use deskpet_core::CursorPoint;

/// Sink that narrates resolved input state to the log. The full app replaces
/// this with the pet renderer bridge.
struct TracingSink;

impl InputSink for TracingSink {
    fn press(&self, key: &str) {
        info!(key, "key down");
    }

    fn release(&self, key: &str) {
        info!(key, "key up");
    }

    fn mouse_button(&self, button: &str, pressed: bool) {
        info!(button, pressed, "mouse button");
    }

    fn mouse_move(&self, position: CursorPoint) {
        info!(x = position.x, y = position.y, "virtual cursor");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_config = config::load()?;

    // Initialise structured logging. Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(app_config.agent.log_level.clone())),
        )
        .init();

    info!("DeskPet agent starting");

    let desktop = Arc::new(HeadlessDesktop::new());
    let source = Arc::new(StdinEventSource::new());
    let sink: Arc<dyn InputSink> = Arc::new(TracingSink);

    let resolver = MonitorResolver::new(
        Arc::clone(&desktop) as Arc<dyn CursorOracle>,
        Arc::clone(&desktop) as Arc<dyn OverlayWindow>,
        Arc::clone(&desktop) as Arc<dyn DisplayOracle>,
    );
    if let Some(monitor) = resolver.resolve(None).await {
        info!(display = %monitor.name, "overlay display resolved");
    }

    let mut options = ProcessorOptions::new(
        app_config.model.support_table(),
        Duration::from_secs_f64(app_config.model.auto_release_delay),
    );
    options.hide_on_hover = app_config.window.hide_on_hover;
    options.pass_through = app_config.window.pass_through;

    let mut processor = DeviceEventProcessor::new(
        Arc::clone(&source) as Arc<dyn DeviceEventSource>,
        Arc::clone(&desktop) as Arc<dyn CursorOracle>,
        Arc::clone(&desktop) as Arc<dyn OverlayWindow>,
        sink,
        options,
    );

    let receiver = match processor.start().await {
        Ok(receiver) => receiver,
        Err(e) => {
            // Recoverable: report and leave the subscription inert.
            error!("device listening failed to start: {e}");
            eprintln!("{}", e.user_message());
            return Ok(());
        }
    };

    // Ctrl-C closes the capture channel; run() then drains the timers.
    let shutdown_source = Arc::clone(&source);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            shutdown_source.stop();
        }
    });

    info!("DeskPet agent ready");
    processor.run(receiver).await;

    info!("DeskPet agent stopped");
    Ok(())
}
