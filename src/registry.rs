//! Registry of independent links, one per peripheral.
//!
//! Each entry is a full [`BleLinkClient`] with its own session and sinks;
//! the registry only looks clients up by device name and fans out shutdown.
//! Peripherals should advertise distinct names (e.g. `PicoW_BLE_1`,
//! `PicoW_BLE_2`) and ideally distinct service UUIDs.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::client::BleLinkClient;
use crate::error::{Error, Result};

/// Links keyed by advertised device name.
#[derive(Default)]
pub struct LinkRegistry {
    links: RwLock<HashMap<String, Arc<BleLinkClient>>>,
}

impl LinkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client under its configured device name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a client with the same device
    /// name is already registered.
    pub fn insert(&self, client: BleLinkClient) -> Result<Arc<BleLinkClient>> {
        let name = client.config().device_name.clone();
        let mut links = self.links.write();

        if links.contains_key(&name) {
            return Err(Error::InvalidParameter {
                name: "device_name".to_string(),
                value: name,
            });
        }

        let client = Arc::new(client);
        links.insert(name.clone(), client.clone());
        info!("Registered link {}", name);

        Ok(client)
    }

    /// Get a link by device name.
    pub fn get(&self, name: &str) -> Option<Arc<BleLinkClient>> {
        self.links.read().get(name).cloned()
    }

    /// Remove a link. The link keeps its session until dropped or shut down.
    pub fn remove(&self, name: &str) -> Option<Arc<BleLinkClient>> {
        self.links.write().remove(name)
    }

    /// Registered device names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.links.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered links.
    pub fn len(&self) -> usize {
        self.links.read().len()
    }

    /// Whether no links are registered.
    pub fn is_empty(&self) -> bool {
        self.links.read().is_empty()
    }

    fn require(&self, name: &str) -> Result<Arc<BleLinkClient>> {
        self.get(name).ok_or_else(|| Error::DeviceNotFound {
            identifier: name.to_string(),
        })
    }

    /// Connect the named link.
    pub async fn connect(&self, name: &str) -> Result<()> {
        self.require(name)?.connect().await
    }

    /// Send a message on the named link.
    pub async fn send_to(&self, name: &str, text: &str) -> Result<()> {
        self.require(name)?.send_message(text).await
    }

    /// Names of links whose transport reports them connected.
    pub async fn connected(&self) -> Vec<String> {
        let links: Vec<_> = self
            .links
            .read()
            .iter()
            .map(|(name, link)| (name.clone(), link.clone()))
            .collect();

        let mut connected = Vec::new();
        for (name, link) in links {
            if link.is_connected().await {
                connected.push(name);
            }
        }
        connected.sort();
        connected
    }

    /// Shut down and remove every link.
    pub async fn shutdown(&self) {
        info!("Shutting down {} links", self.len());

        let links: Vec<_> = self.links.write().drain().collect();
        for (name, link) in links {
            if let Err(e) = link.shutdown().await {
                warn!("Error shutting down link {}: {}", name, e);
            }
        }
    }
}
