//! [`BleTransport`] on top of the native Bluetooth stack via `btleplug`.
//!
//! Device selection is a name-filtered scan: the first peripheral whose
//! advertised local name equals the requested name is selected. The scan
//! stands in for a device chooser, so running out of time or calling
//! [`PlatformTransport::cancel_selection`] ends it the way dismissing a
//! chooser would.

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::stream::{Stream, StreamExt};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::ble::transport::{
    BleTransport, CharacteristicHandle, DeviceHandle, Notification, NotificationStream,
    ServiceHandle, WriteMode,
};
use crate::error::{Error, Result};

/// A peripheral picked by [`PlatformTransport::request_device`].
struct SelectedDevice {
    peripheral: Peripheral,
    /// The only service the client declared as usable.
    service: Uuid,
}

/// BLE transport backed by the first local Bluetooth adapter.
pub struct PlatformTransport {
    /// The BLE adapter used for scanning and connections.
    adapter: Adapter,
    /// Devices selected so far, by peripheral identifier.
    devices: RwLock<HashMap<String, SelectedDevice>>,
    /// How long a selection scan runs before it counts as cancelled.
    selection_timeout: Duration,
    /// Wakes an in-flight selection scan to cancel it.
    cancel: Notify,
}

impl PlatformTransport {
    /// Default time a selection scan may take.
    pub const DEFAULT_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a transport on the first available adapter.
    ///
    /// # Errors
    ///
    /// Returns an error if Bluetooth is not available.
    pub async fn new() -> Result<Self> {
        let manager = Manager::new()
            .await
            .map_err(|_e| Error::BluetoothUnavailable)?;

        let adapter = manager
            .adapters()
            .await
            .map_err(Error::Bluetooth)?
            .into_iter()
            .next()
            .ok_or(Error::BluetoothUnavailable)?;

        info!(
            "Using Bluetooth adapter: {:?}",
            adapter.adapter_info().await.ok()
        );

        Ok(Self::with_adapter(adapter))
    }

    /// Create a transport on a specific adapter.
    pub fn with_adapter(adapter: Adapter) -> Self {
        Self {
            adapter,
            devices: RwLock::new(HashMap::new()),
            selection_timeout: Self::DEFAULT_SELECTION_TIMEOUT,
            cancel: Notify::new(),
        }
    }

    /// Set how long a selection scan may take.
    pub fn with_selection_timeout(mut self, timeout: Duration) -> Self {
        self.selection_timeout = timeout;
        self
    }

    /// Cancel any device selection currently in progress.
    pub fn cancel_selection(&self) {
        self.cancel.notify_waiters();
    }

    /// Get the underlying adapter.
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    fn peripheral(&self, device_id: &str) -> Result<Peripheral> {
        self.devices
            .read()
            .get(device_id)
            .map(|d| d.peripheral.clone())
            .ok_or_else(|| Error::DeviceNotFound {
                identifier: device_id.to_string(),
            })
    }

    fn find_characteristic(&self, handle: &CharacteristicHandle) -> Result<Characteristic> {
        let peripheral = self.peripheral(&handle.device_id)?;

        peripheral
            .services()
            .into_iter()
            .find(|s| s.uuid == handle.service_uuid)
            .and_then(|s| s.characteristics.into_iter().find(|c| c.uuid == handle.uuid))
            .ok_or_else(|| Error::CharacteristicNotFound {
                uuid: handle.uuid.to_string(),
            })
    }

    /// Wait for a peripheral advertising exactly `name`.
    async fn find_by_name<S>(adapter: &Adapter, events: &mut S, name: &str) -> Result<Peripheral>
    where
        S: Stream<Item = CentralEvent> + Unpin,
    {
        // Peripherals seen by an earlier scan do not emit a new discovery event.
        for peripheral in adapter.peripherals().await.map_err(Error::Bluetooth)? {
            if Self::advertises(&peripheral, name).await {
                return Ok(peripheral);
            }
        }

        while let Some(event) = events.next().await {
            let id = match event {
                CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                _ => continue,
            };

            trace!("Device seen during selection: {:?}", id);

            let peripheral = match adapter.peripheral(&id).await {
                Ok(p) => p,
                Err(e) => {
                    trace!("Failed to get peripheral: {}", e);
                    continue;
                }
            };

            if Self::advertises(&peripheral, name).await {
                return Ok(peripheral);
            }
        }

        Err(Error::Internal("adapter event stream ended".to_string()))
    }

    async fn advertises(peripheral: &Peripheral, name: &str) -> bool {
        match peripheral.properties().await {
            Ok(Some(properties)) => properties.local_name.as_deref() == Some(name),
            _ => false,
        }
    }
}

#[async_trait]
impl BleTransport for PlatformTransport {
    async fn request_device(&self, name: &str, service: Uuid) -> Result<DeviceHandle> {
        info!("Scanning for device {} (service {})", name, service);

        let mut events = self.adapter.events().await.map_err(Error::Bluetooth)?;
        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(Error::Bluetooth)?;

        let outcome = tokio::select! {
            found = Self::find_by_name(&self.adapter, &mut events, name) => Some(found),
            _ = tokio::time::sleep(self.selection_timeout) => {
                debug!("Selection timed out after {:?}", self.selection_timeout);
                None
            }
            _ = self.cancel.notified() => {
                debug!("Selection cancelled");
                None
            }
        };

        if let Err(e) = self.adapter.stop_scan().await {
            warn!("Failed to stop scan: {}", e);
        }

        let peripheral = match outcome {
            Some(found) => found?,
            None => {
                return Err(Error::SelectionCancelled {
                    name: name.to_string(),
                })
            }
        };

        let id = peripheral.id().to_string();
        info!("Device selected: {} ({})", name, id);

        self.devices
            .write()
            .insert(id.clone(), SelectedDevice { peripheral, service });

        Ok(DeviceHandle {
            id,
            name: name.to_string(),
        })
    }

    async fn connect(&self, device: &DeviceHandle) -> Result<()> {
        let peripheral = self.peripheral(&device.id)?;

        peripheral
            .connect()
            .await
            .map_err(|e| Error::ConnectionFailed {
                reason: e.to_string(),
            })?;

        peripheral
            .discover_services()
            .await
            .map_err(|e| Error::ConnectionFailed {
                reason: format!("service discovery failed: {}", e),
            })?;

        debug!(
            "Discovered {} services on {}",
            peripheral.services().len(),
            device.name
        );

        Ok(())
    }

    async fn disconnect(&self, device: &DeviceHandle) -> Result<()> {
        let peripheral = self.peripheral(&device.id)?;
        peripheral.disconnect().await.map_err(Error::Bluetooth)
    }

    async fn is_connected(&self, device: &DeviceHandle) -> Result<bool> {
        let peripheral = self.peripheral(&device.id)?;
        peripheral.is_connected().await.map_err(Error::Bluetooth)
    }

    async fn resolve_service(&self, device: &DeviceHandle, uuid: Uuid) -> Result<ServiceHandle> {
        let (peripheral, declared) = {
            let devices = self.devices.read();
            let selected = devices.get(&device.id).ok_or_else(|| Error::DeviceNotFound {
                identifier: device.id.clone(),
            })?;
            (selected.peripheral.clone(), selected.service)
        };

        if uuid != declared {
            debug!("Service {} was not declared as usable", uuid);
            return Err(Error::ServiceNotFound {
                uuid: uuid.to_string(),
            });
        }

        if !peripheral.services().iter().any(|s| s.uuid == uuid) {
            return Err(Error::ServiceNotFound {
                uuid: uuid.to_string(),
            });
        }

        Ok(ServiceHandle {
            device_id: device.id.clone(),
            uuid,
        })
    }

    async fn resolve_characteristic(
        &self,
        service: &ServiceHandle,
        uuid: Uuid,
    ) -> Result<CharacteristicHandle> {
        let handle = CharacteristicHandle {
            device_id: service.device_id.clone(),
            service_uuid: service.uuid,
            uuid,
        };

        let characteristic = self.find_characteristic(&handle)?;
        debug!(
            "Found characteristic {}, properties: {:?}",
            uuid, characteristic.properties
        );

        Ok(handle)
    }

    async fn notifications(&self, device: &DeviceHandle) -> Result<NotificationStream> {
        let peripheral = self.peripheral(&device.id)?;
        let stream = peripheral.notifications().await.map_err(Error::Bluetooth)?;

        Ok(Box::pin(stream.map(|n| Notification {
            uuid: n.uuid,
            value: n.value,
        })))
    }

    async fn subscribe(&self, characteristic: &CharacteristicHandle) -> Result<()> {
        let peripheral = self.peripheral(&characteristic.device_id)?;
        let target = self.find_characteristic(characteristic)?;

        peripheral.subscribe(&target).await.map_err(|e| {
            debug!("Failed to subscribe to {}: {:?}", characteristic.uuid, e);
            Error::Bluetooth(e)
        })
    }

    async fn unsubscribe(&self, characteristic: &CharacteristicHandle) -> Result<()> {
        let peripheral = self.peripheral(&characteristic.device_id)?;
        let target = self.find_characteristic(characteristic)?;

        peripheral
            .unsubscribe(&target)
            .await
            .map_err(Error::Bluetooth)
    }

    async fn write(
        &self,
        characteristic: &CharacteristicHandle,
        data: &[u8],
        mode: WriteMode,
    ) -> Result<()> {
        let peripheral = self.peripheral(&characteristic.device_id)?;
        let target = self.find_characteristic(characteristic)?;

        peripheral
            .write(&target, data, mode.into())
            .await
            .map_err(Error::Bluetooth)?;

        trace!(
            "Wrote {} bytes to characteristic {}",
            data.len(),
            characteristic.uuid
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_timeout() {
        assert_eq!(
            PlatformTransport::DEFAULT_SELECTION_TIMEOUT,
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlatformTransport>();
    }
}
