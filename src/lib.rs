//! wifi-keeper library.
//!
//! A self-healing WiFi station connection manager for ESP32 firmware.  The
//! [`ConnectionManager`](manager::ConnectionManager) keeps the device
//! associated with one of a list of access points, handling connect
//! timeouts, reconnect backoff and candidate rotation on its own.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; everything else builds and tests on the host.
//! Device builds need the `espidf` feature, which pulls in the ESP-IDF
//! crates:
//!
//! ```text
//! cargo build --release --target xtensa-esp32s3-espidf --features espidf
//! ```

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("ESP-IDF targets require `--features espidf`");

pub mod adapters;
pub mod app;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod manager;

pub use app::events::{ManagerState, WifiEvent};
pub use app::ports::{EventSink, RadioDriver, TimerHandle, TimerService};
pub use config::ManagerConfig;
pub use credentials::{AccessPoint, AuthMethod};
pub use error::{DriverError, Error};
pub use events::{Input, InputQueue};
pub use manager::{ConnectionManager, ConnectionStats, ManagerStatus, TimerRole};
