//! The BLE transport capability.
//!
//! [`BleTransport`] is everything the link client needs from a BLE stack:
//! device selection, GATT connection, service and characteristic
//! resolution, notifications and writes. Handles returned by a transport are
//! opaque to the client and only meaningful to the transport that issued
//! them.

use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use uuid::Uuid;

use crate::error::Result;

/// A device selected by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceHandle {
    /// Transport-assigned identifier.
    pub id: String,
    /// Advertised name the device was selected by.
    pub name: String,
}

/// A resolved primary service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceHandle {
    /// Identifier of the owning device.
    pub device_id: String,
    /// Service UUID.
    pub uuid: Uuid,
}

/// A resolved characteristic within a service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacteristicHandle {
    /// Identifier of the owning device.
    pub device_id: String,
    /// UUID of the service that contains the characteristic.
    pub service_uuid: Uuid,
    /// Characteristic UUID.
    pub uuid: Uuid,
}

/// Value-change notification from a characteristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// UUID of the characteristic that sent the notification.
    pub uuid: Uuid,
    /// The notified value.
    pub value: Vec<u8>,
}

/// Stream of notifications for one device.
pub type NotificationStream = Pin<Box<dyn Stream<Item = Notification> + Send>>;

/// How a write is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WriteMode {
    /// Wait for the peripheral to acknowledge the write.
    #[default]
    WithResponse,
    /// Fire and forget.
    WithoutResponse,
}

impl From<WriteMode> for btleplug::api::WriteType {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::WithResponse => btleplug::api::WriteType::WithResponse,
            WriteMode::WithoutResponse => btleplug::api::WriteType::WithoutResponse,
        }
    }
}

/// A host-provided BLE stack.
///
/// Implementations tag failures with the matching [`crate::Error`] variant:
/// `SelectionCancelled` when no device is chosen, `ConnectionFailed` when the
/// GATT connection cannot be opened, `ServiceNotFound` /
/// `CharacteristicNotFound` when an identifier is absent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BleTransport: Send + Sync {
    /// Select a device advertising `name`, declaring `service` as usable.
    async fn request_device(&self, name: &str, service: Uuid) -> Result<DeviceHandle>;

    /// Open a GATT connection to the device.
    async fn connect(&self, device: &DeviceHandle) -> Result<()>;

    /// Close the GATT connection to the device.
    async fn disconnect(&self, device: &DeviceHandle) -> Result<()>;

    /// Query the live connection state of the device.
    async fn is_connected(&self, device: &DeviceHandle) -> Result<bool>;

    /// Resolve a primary service on a connected device.
    async fn resolve_service(&self, device: &DeviceHandle, uuid: Uuid) -> Result<ServiceHandle>;

    /// Resolve a characteristic within a service.
    async fn resolve_characteristic(
        &self,
        service: &ServiceHandle,
        uuid: Uuid,
    ) -> Result<CharacteristicHandle>;

    /// Stream of every notification the device delivers.
    async fn notifications(&self, device: &DeviceHandle) -> Result<NotificationStream>;

    /// Activate notifications on a characteristic.
    async fn subscribe(&self, characteristic: &CharacteristicHandle) -> Result<()>;

    /// Deactivate notifications on a characteristic.
    async fn unsubscribe(&self, characteristic: &CharacteristicHandle) -> Result<()>;

    /// Write a value to a characteristic.
    async fn write(
        &self,
        characteristic: &CharacteristicHandle,
        data: &[u8],
        mode: WriteMode,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_mode_conversion() {
        assert!(matches!(
            btleplug::api::WriteType::from(WriteMode::WithResponse),
            btleplug::api::WriteType::WithResponse
        ));
        assert!(matches!(
            btleplug::api::WriteType::from(WriteMode::WithoutResponse),
            btleplug::api::WriteType::WithoutResponse
        ));
        assert_eq!(WriteMode::default(), WriteMode::WithResponse);
    }
}
