//! # ble-text-link
//!
//! A small Bluetooth Low Energy client that relays UTF-8 text lines between
//! a host application and a single peripheral, such as a Raspberry Pi Pico W
//! running a UART-style GATT service.
//!
//! The client selects a device by advertised name, opens a GATT connection,
//! resolves one service with a notify characteristic and a write
//! characteristic, and then:
//!
//! - appends every notification, decoded as text, to a log sink
//! - writes each message as one UTF-8 characteristic write
//! - reports progress and failures to a status sink
//!
//! There is no framing, retry or reconnection logic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ble_text_link::{BleLinkClient, LinkConfig, LinkSinks, PlatformTransport, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let transport = Arc::new(PlatformTransport::new().await?);
//!     let sinks = LinkSinks::new(
//!         Arc::new(|status: &str| println!("[status] {}", status)),
//!         Arc::new(|line: &str| print!("{}", line)),
//!         Arc::new(|_enabled: bool| {}),
//!     );
//!
//!     let client = BleLinkClient::new(LinkConfig::default(), transport, sinks);
//!     client.connect().await?;
//!     client.send_message("LED_ON").await?;
//!
//!     client.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Platform Notes
//!
//! ### macOS
//! Requires Bluetooth permission. Add `NSBluetoothAlwaysUsageDescription`
//! to your Info.plist for bundled apps.
//!
//! ### Linux
//! Requires BlueZ. User may need to be in the `bluetooth` group.
//!
//! ### Windows
//! Requires Windows 10 or later with Bluetooth LE support.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for configuration types

// Public modules
pub mod ble;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod registry;
pub mod sink;
pub mod status;

mod session;

// Re-exports for convenience
pub use ble::{BleTransport, DeviceHandle, PlatformTransport, WriteMode};
pub use client::{BleLinkClient, LinkSinks};
pub use config::LinkConfig;
pub use error::{Error, ErrorKind, Result};
pub use registry::LinkRegistry;
pub use sink::{ConnectControl, ControlState, LogSink, StatusLine, StatusSink, TextLog};
pub use status::StatusMessage;
