//! Link configuration.

use std::time::Duration;
use uuid::Uuid;

use crate::ble::transport::WriteMode;
use crate::ble::uuids::{
    parse_identifier, DEFAULT_DEVICE_NAME, LINK_NOTIFY_UUID, LINK_SERVICE_UUID, LINK_WRITE_UUID,
};
use crate::error::Result;

/// Which peripheral to talk to and how.
///
/// Identifiers must match what the peripheral advertises and registers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Advertised device name, matched exactly.
    pub device_name: String,
    /// Service containing both characteristics.
    pub service_uuid: Uuid,
    /// Characteristic the peripheral notifies text on.
    pub notify_uuid: Uuid,
    /// Characteristic text is written to.
    pub write_uuid: Uuid,
    /// Delay between registering the listener and activating notifications.
    pub notify_grace: Duration,
    /// Acknowledgement mode for writes.
    pub write_mode: WriteMode,
}

impl LinkConfig {
    /// Default delay before notifications are activated.
    ///
    /// Some stacks drop the first notifications when activation immediately
    /// follows characteristic resolution.
    pub const DEFAULT_NOTIFY_GRACE: Duration = Duration::from_millis(100);

    /// Build a configuration from string identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidParameter`] if an identifier is not a
    /// valid UUID or the name is empty.
    pub fn new(device_name: &str, service: &str, notify: &str, write: &str) -> Result<Self> {
        if device_name.is_empty() {
            return Err(crate::Error::InvalidParameter {
                name: "device_name".to_string(),
                value: String::new(),
            });
        }

        Ok(Self {
            device_name: device_name.to_string(),
            service_uuid: parse_identifier("service", service)?,
            notify_uuid: parse_identifier("notify", notify)?,
            write_uuid: parse_identifier("write", write)?,
            ..Self::default()
        })
    }

    /// Set the advertised device name.
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Set the notification grace period.
    pub fn with_notify_grace(mut self, grace: Duration) -> Self {
        self.notify_grace = grace;
        self
    }

    /// Set the write acknowledgement mode.
    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            service_uuid: LINK_SERVICE_UUID,
            notify_uuid: LINK_NOTIFY_UUID,
            write_uuid: LINK_WRITE_UUID,
            notify_grace: Self::DEFAULT_NOTIFY_GRACE,
            write_mode: WriteMode::WithResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = LinkConfig::default();
        assert_eq!(config.device_name, "PicoW_BLE");
        assert_eq!(config.service_uuid, LINK_SERVICE_UUID);
        assert_eq!(config.notify_grace, Duration::from_millis(100));
        assert_eq!(config.write_mode, WriteMode::WithResponse);
    }

    #[test]
    fn test_new_parses_identifiers() {
        let config = LinkConfig::new(
            "PicoW_BLE_2",
            "6e400001-b5a3-f393-e0a9-e50e24dcca9e",
            "6e400003-b5a3-f393-e0a9-e50e24dcca9e",
            "6e400002-b5a3-f393-e0a9-e50e24dcca9e",
        )
        .unwrap();

        assert_eq!(config.device_name, "PicoW_BLE_2");
        assert_eq!(
            config.notify_uuid,
            Uuid::from_u128(0x6e40_0003_b5a3_f393_e0a9_e50e24dcca9e)
        );
        assert_eq!(config.notify_grace, LinkConfig::DEFAULT_NOTIFY_GRACE);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(LinkConfig::new("", "ffe0", "ffe1", "ffe2").is_err());

        let err = LinkConfig::new(
            "PicoW_BLE",
            "0000ffe0-0000-1000-8000-0080000b34fb",
            "not-a-uuid",
            "0000ffe2-0000-1000-8000-0080000b34fb",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter: notify = not-a-uuid"
        );
    }

    #[test]
    fn test_builders() {
        let config = LinkConfig::default()
            .with_device_name("Other")
            .with_notify_grace(Duration::ZERO)
            .with_write_mode(WriteMode::WithoutResponse);

        assert_eq!(config.device_name, "Other");
        assert_eq!(config.notify_grace, Duration::ZERO);
        assert_eq!(config.write_mode, WriteMode::WithoutResponse);
    }
}
