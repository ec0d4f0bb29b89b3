//! Per-client session state.
//!
//! A [`Session`] holds the handles of one active or attempted connection.
//! It is populated step by step while connecting and cleared as a whole.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::ble::transport::{BleTransport, CharacteristicHandle, DeviceHandle};

/// Closes a connection when dropped, unless disarmed first.
///
/// This is the teardown path for hosts that drop the client without calling
/// [`crate::BleLinkClient::shutdown`].
pub struct TeardownHook {
    on_teardown: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TeardownHook {
    /// Create a hook that runs `on_teardown` when dropped.
    pub(crate) fn new(on_teardown: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            on_teardown: Some(Box::new(on_teardown)),
        }
    }

    /// Hook that disconnects `device` if it is still connected.
    ///
    /// The disconnect is spawned on the current tokio runtime; outside a
    /// runtime the hook does nothing.
    pub(crate) fn disconnect_on_drop(transport: Arc<dyn BleTransport>, device: DeviceHandle) -> Self {
        Self::new(move || {
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                warn!("No runtime available to close {} on teardown", device.name);
                return;
            };

            runtime.spawn(async move {
                if transport.is_connected(&device).await.unwrap_or(false) {
                    match transport.disconnect(&device).await {
                        Ok(()) => info!("Bluetooth disconnected due to teardown: {}", device.name),
                        Err(e) => warn!("Failed to disconnect {} on teardown: {}", device.name, e),
                    }
                }
            });
        })
    }

    /// Drop the hook without running it.
    pub fn disarm(mut self) {
        self.on_teardown.take();
    }
}

impl Drop for TeardownHook {
    fn drop(&mut self) {
        if let Some(f) = self.on_teardown.take() {
            f();
        }
    }
}

/// Handles of one connection.
#[derive(Default)]
pub(crate) struct Session {
    /// Selected device.
    pub device: Option<DeviceHandle>,
    /// Characteristic notifications arrive on.
    pub notify: Option<CharacteristicHandle>,
    /// Characteristic text is written to. `Some` iff a send may succeed.
    pub write: Option<CharacteristicHandle>,
    /// Task forwarding notifications to the log sink.
    pub listener: Option<JoinHandle<()>>,
    /// Closes the connection if the client goes away while connected.
    pub teardown: Option<TeardownHook>,
    /// Set once notifications are active and the link is usable.
    pub established: bool,
}

impl Session {
    /// Move everything out, leaving an empty session behind.
    pub fn take(&mut self) -> Session {
        std::mem::take(self)
    }

    /// Replace the listener task, stopping any previous one.
    pub fn set_listener(&mut self, listener: JoinHandle<()>) {
        if let Some(old) = self.listener.replace(listener) {
            old.abort();
        }
    }

    /// Replace the teardown hook, disarming any previous one.
    pub fn set_teardown(&mut self, hook: TeardownHook) {
        if let Some(old) = self.teardown.replace(hook) {
            old.disarm();
        }
    }

    /// Stop the listener and disarm the teardown hook.
    pub fn stop(mut self) {
        if let Some(hook) = self.teardown.take() {
            hook.disarm();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_hook(counter: &Arc<AtomicUsize>) -> TeardownHook {
        let counter = counter.clone();
        TeardownHook::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_hook_runs_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        drop(counting_hook(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disarmed_hook_does_not_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        counting_hook(&counter).disarm();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_replacing_hook_disarms_previous() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut session = Session::default();

        session.set_teardown(counting_hook(&counter));
        session.set_teardown(counting_hook(&counter));
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        drop(session);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stop_disarms_hook() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut session = Session::default();
        session.set_teardown(counting_hook(&counter));

        let taken = session.take();
        assert!(session.teardown.is_none());

        taken.stop();
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_take_clears_established() {
        let mut session = Session::default();
        session.established = true;

        let taken = session.take();
        assert!(taken.established);
        assert!(!session.established);
    }
}
