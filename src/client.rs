//! The link client.
//!
//! [`BleLinkClient`] owns one session with one peripheral and relays text
//! in both directions. Failures never escape unreported: each one is written
//! to the status sink before the error is returned.

use futures::stream::StreamExt;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::ble::transport::{BleTransport, DeviceHandle, NotificationStream};
use crate::codec;
use crate::config::LinkConfig;
use crate::error::{Error, Result};
use crate::session::{Session, TeardownHook};
use crate::sink::{ConnectControl, LogSink, StatusSink};
use crate::status::StatusMessage;

/// Where a client reports to.
#[derive(Clone)]
pub struct LinkSinks {
    /// Status line.
    pub status: Arc<dyn StatusSink>,
    /// Log of received text.
    pub log: Arc<dyn LogSink>,
    /// Connect trigger toggle.
    pub control: Arc<dyn ConnectControl>,
}

impl LinkSinks {
    /// Bundle the three outputs.
    pub fn new(
        status: Arc<dyn StatusSink>,
        log: Arc<dyn LogSink>,
        control: Arc<dyn ConnectControl>,
    ) -> Self {
        Self {
            status,
            log,
            control,
        }
    }

    /// Sinks that discard everything.
    pub fn silent() -> Self {
        Self {
            status: Arc::new(|_: &str| {}),
            log: Arc::new(|_: &str| {}),
            control: Arc::new(|_: bool| {}),
        }
    }
}

/// Text link to a single BLE peripheral.
pub struct BleLinkClient {
    config: LinkConfig,
    transport: Arc<dyn BleTransport>,
    session: RwLock<Session>,
    sinks: LinkSinks,
}

impl BleLinkClient {
    /// Create a client. Nothing happens on the transport until [`connect`].
    ///
    /// [`connect`]: BleLinkClient::connect
    pub fn new(config: LinkConfig, transport: Arc<dyn BleTransport>, sinks: LinkSinks) -> Self {
        Self {
            config,
            transport,
            session: RwLock::new(Session::default()),
            sinks,
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The selected device, if any.
    pub fn device(&self) -> Option<DeviceHandle> {
        self.session.read().device.clone()
    }

    /// Select, connect and set up the link.
    ///
    /// Does nothing if a fully set up session is still connected. On failure
    /// the classified message goes to the status sink and handles resolved so
    /// far stay in the session, to be replaced by the next attempt.
    pub async fn connect(&self) -> Result<()> {
        let established = self.session.read().established;
        if established && self.is_connected().await {
            debug!("Already connected");
            return Ok(());
        }

        // A half-built session, or one that dropped on the transport side.
        self.session.write().take().stop();

        match self.establish().await {
            Ok(name) => {
                info!("Connected to {}", name);
                self.report(StatusMessage::Connected { name });
                self.sinks.control.set_enabled(false);
                Ok(())
            }
            Err(e) => {
                error!("Connection error: {}", e);
                self.report(StatusMessage::for_connect_error(&e));
                Err(e)
            }
        }
    }

    async fn establish(&self) -> Result<String> {
        let config = &self.config;

        let device = self
            .transport
            .request_device(&config.device_name, config.service_uuid)
            .await?;
        info!("Device selected: {}", device.name);
        self.session.write().device = Some(device.clone());
        self.report(StatusMessage::Connecting);

        self.transport.connect(&device).await?;
        info!("Connected to GATT server");
        self.report(StatusMessage::Establishing {
            name: device.name.clone(),
        });

        let service = self
            .transport
            .resolve_service(&device, config.service_uuid)
            .await?;
        debug!("Service discovered: {}", service.uuid);

        let notify = self
            .transport
            .resolve_characteristic(&service, config.notify_uuid)
            .await?;
        debug!("Notify characteristic discovered: {}", notify.uuid);
        self.session.write().notify = Some(notify.clone());

        let write = self
            .transport
            .resolve_characteristic(&service, config.write_uuid)
            .await?;
        debug!("Write characteristic discovered: {}", write.uuid);
        self.session.write().write = Some(write);

        let notifications = self.transport.notifications(&device).await?;
        let listener = spawn_listener(notifications, notify.uuid, self.sinks.log.clone());
        let teardown = TeardownHook::disconnect_on_drop(self.transport.clone(), device.clone());
        {
            let mut session = self.session.write();
            session.set_listener(listener);
            session.set_teardown(teardown);
        }

        if !config.notify_grace.is_zero() {
            tokio::time::sleep(config.notify_grace).await;
        }

        self.transport.subscribe(&notify).await?;
        info!("Notifications started on {}", notify.uuid);
        self.session.write().established = true;

        Ok(device.name)
    }

    /// Send one message as a single UTF-8 write.
    ///
    /// On failure the connect trigger is re-enabled so the host can offer a
    /// fresh connect.
    pub async fn send_message(&self, text: &str) -> Result<()> {
        match self.write_text(text).await {
            Ok(()) => {
                debug!("Sent: {}", text);
                Ok(())
            }
            Err(e) => {
                error!("Send error: {}", e);
                self.sinks.control.set_enabled(true);
                self.report(StatusMessage::SendFailed);
                Err(e)
            }
        }
    }

    async fn write_text(&self, text: &str) -> Result<()> {
        let write = self.session.read().write.clone();
        let write = write.ok_or(Error::NotConnected)?;

        let data = codec::encode_text(text);
        trace!("Writing {} bytes: {:02X?}", data.len(), data);

        self.transport
            .write(&write, &data, self.config.write_mode)
            .await
    }

    /// Whether the transport reports the session's device as connected.
    pub async fn is_connected(&self) -> bool {
        let device = self.session.read().device.clone();
        let Some(device) = device else {
            return false;
        };

        match self.transport.is_connected(&device).await {
            Ok(connected) => connected,
            Err(e) => {
                warn!("Failed to query connection state: {}", e);
                false
            }
        }
    }

    /// Close the connection. A no-op when not connected.
    pub async fn disconnect(&self) -> Result<()> {
        if !self.is_connected().await {
            debug!("Not connected, ignoring disconnect request");
            return Ok(());
        }

        let session = self.session.write().take();
        let device = session.device.clone();
        let notify = session.notify.clone();
        session.stop();

        if let Some(notify) = notify {
            if let Err(e) = self.transport.unsubscribe(&notify).await {
                warn!("Failed to stop notifications on {}: {}", notify.uuid, e);
            }
        }

        let result = match device {
            Some(device) => self.transport.disconnect(&device).await,
            None => Ok(()),
        };

        self.sinks.control.set_enabled(true);

        match &result {
            Ok(()) => {
                info!("Bluetooth disconnected.");
                self.report(StatusMessage::Disconnected);
            }
            Err(e) => {
                error!("Failed to disconnect: {}", e);
                self.report(StatusMessage::ConnectError(e.to_string()));
            }
        }

        result
    }

    /// Disconnect and discard any partial session.
    pub async fn shutdown(&self) -> Result<()> {
        let result = self.disconnect().await;
        self.session.write().take().stop();
        result
    }

    fn report(&self, message: StatusMessage) {
        self.sinks.status.set_status(&message.to_string());
    }
}

/// Forward notifications from `notify_uuid` to the log, one line each.
fn spawn_listener(
    mut notifications: NotificationStream,
    notify_uuid: Uuid,
    log: Arc<dyn LogSink>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Notification listener started");

        while let Some(notification) = notifications.next().await {
            if notification.uuid != notify_uuid {
                trace!("Ignoring notification from {}", notification.uuid);
                continue;
            }

            let line = codec::log_line(&notification.value);
            debug!("Received: {}", line.trim_end_matches('\n'));
            log.append(&line);
        }

        debug!("Notification listener stopped");
    })
}
