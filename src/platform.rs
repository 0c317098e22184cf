//! Platform controller
//!
//! Finds devices, starts one accessory session per device, keeps them polled,
//! and serves the HTTP API until interrupted.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::accessory::{AccessoryHost, RokuAccessory};
use crate::api::ApiServer;
use crate::roku::{DeviceDriver, RokuClient};
use crate::{Config, Result, discovery};

/// Owns every device session for the lifetime of the process
pub struct Platform {
    config: Config,
    host: Arc<dyn AccessoryHost>,
    accessories: Vec<Arc<RokuAccessory>>,
}

impl Platform {
    /// Create a platform publishing to `host`
    #[must_use]
    pub fn new(config: Config, host: Arc<dyn AccessoryHost>) -> Self {
        Self {
            config,
            host,
            accessories: Vec::new(),
        }
    }

    /// Sessions started so far
    #[must_use]
    pub fn accessories(&self) -> &[Arc<RokuAccessory>] {
        &self.accessories
    }

    /// Addresses to connect to: discovered devices plus configured hosts
    pub async fn device_addresses(&self) -> Vec<String> {
        let discovered = if self.config.discovery.enabled {
            match discovery::discover(self.config.discovery.timeout).await {
                Ok(devices) => devices.into_iter().map(|d| d.location).collect(),
                Err(e) => {
                    tracing::warn!(error = %e, "device discovery failed");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        merge_addresses(discovered, &self.config.hosts)
    }

    /// Connect to every address, skipping devices that fail or repeat
    ///
    /// Returns the number of sessions started.
    pub async fn connect_all(&mut self, addresses: &[String]) -> usize {
        let mut started = 0;
        for address in addresses {
            let client = match RokuClient::new(address) {
                Ok(client) => client,
                Err(e) => {
                    tracing::warn!(%address, error = %e, "invalid device address");
                    continue;
                }
            };

            if self.connect(Arc::new(client)).await {
                started += 1;
            } else {
                tracing::warn!(%address, "device not added");
            }
        }
        started
    }

    /// Start a session over an arbitrary driver
    ///
    /// Returns false if the device could not be read or is already connected.
    pub async fn connect(&mut self, driver: Arc<dyn DeviceDriver>) -> bool {
        // Check identity first so a repeat never reaches the host
        let info = match driver.device_info().await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read device info");
                return false;
            }
        };
        if self.accessories.iter().any(|a| a.id() == info.serial_number) {
            tracing::debug!(id = %info.serial_number, "device already connected");
            return false;
        }

        let accessory = match RokuAccessory::connect_with_info(
            driver,
            Arc::clone(&self.host),
            self.config.accessory.clone(),
            info,
        )
        .await
        {
            Ok(accessory) => accessory,
            Err(e) => {
                tracing::warn!(error = %e, "failed to connect to device");
                return false;
            }
        };

        self.accessories.push(Arc::new(accessory));
        true
    }

    /// Discover, connect, poll and serve until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if the API port cannot be bound or the server fails
    pub async fn run(mut self) -> Result<()> {
        let addresses = self.device_addresses().await;
        let started = self.connect_all(&addresses).await;

        if started == 0 {
            tracing::warn!("no Roku devices connected");
        } else {
            tracing::info!(devices = started, "Roku devices connected");
        }

        // Bind first; a taken port is a startup error
        let server = if self.config.api_server.enabled {
            Some(ApiServer::bind(self.accessories.clone(), self.config.api_server.port).await?)
        } else {
            None
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let pollers: Vec<_> = self
            .accessories
            .iter()
            .map(|a| Arc::clone(a).spawn_poller(self.config.polling_interval, shutdown_rx.clone()))
            .collect();

        let server = server.map(|server| {
            let mut server_shutdown = shutdown_rx.clone();
            tokio::spawn(server.serve(async move {
                let _ = server_shutdown.wait_for(|stop| *stop).await;
            }))
        });

        tokio::signal::ctrl_c().await?;
        tracing::info!("shutdown requested");
        let _ = shutdown_tx.send(true);

        for poller in pollers {
            let _ = poller.await;
        }
        if let Some(server) = server {
            match server.await {
                Ok(result) => result?,
                Err(e) => tracing::warn!(error = %e, "API server task failed"),
            }
        }

        Ok(())
    }
}

/// Merge discovered and configured addresses, dropping repeats of the same host
#[must_use]
pub fn merge_addresses(discovered: Vec<String>, configured: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    discovered
        .into_iter()
        .chain(configured.iter().cloned())
        .filter(|address| {
            let key = RokuClient::new(address)
                .map_or_else(|_| address.clone(), |c| c.host().to_string());
            seen.insert(key)
        })
        .collect()
}
