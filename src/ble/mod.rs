//! BLE communication module.
//!
//! The transport abstraction the link client runs on, its `btleplug`
//! implementation, and the default link identifiers.

pub mod platform;
pub mod transport;
pub mod uuids;

pub use platform::PlatformTransport;
pub use transport::{
    BleTransport, CharacteristicHandle, DeviceHandle, Notification, NotificationStream,
    ServiceHandle, WriteMode,
};
pub use uuids::*;
