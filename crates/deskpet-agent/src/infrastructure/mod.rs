//! Infrastructure layer: everything that touches the outside world.
//!
//! - **`capture`** – The device-event channel from the native input-capture
//!   service, behind the [`capture::DeviceEventSource`] trait.
//! - **`desktop`** – Async oracles for cursor position, overlay window
//!   geometry/opacity, and display enumeration.
//! - **`storage`** – TOML configuration persistence.

pub mod capture;
pub mod desktop;
pub mod storage;
