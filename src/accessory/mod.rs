//! Television accessory for one Roku device
//!
//! A `RokuAccessory` is one device session: the app index built at connect
//! time, the last known television state, and the driver and host it was
//! given. Host-side writes become ECP commands; polls turn device state back
//! into characteristic updates.

pub mod host;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub use host::{
    AccessoryDescriptor, AccessoryHost, CharacteristicUpdate, InputSource, InputSourceType,
    LoggingHost,
};

use crate::apps::{AppIndex, MappedApp};
use crate::roku::{DeviceDriver, DeviceInfo, EcpKey, RemoteKey};
use crate::{Error, Result};

/// Behaviour shared by every accessory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorySettings {
    /// App names left out of the input list
    pub excluded_apps: HashSet<String>,
    /// Key sent for the host's information button
    pub info_button_override: Option<EcpKey>,
    /// `VolumeUp` presses per volume-up request
    pub volume_increment: u8,
    /// `VolumeDown` presses per volume-down request
    pub volume_decrement: u8,
}

impl Default for AccessorySettings {
    fn default() -> Self {
        Self {
            excluded_apps: HashSet::new(),
            info_button_override: None,
            volume_increment: 1,
            volume_decrement: 1,
        }
    }
}

/// Characteristic values the host sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelevisionState {
    pub active: bool,
    pub active_identifier: i32,
    pub muted: bool,
}

/// Volume selector direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeDirection {
    Up,
    Down,
}

/// One connected Roku device exposed as a television
pub struct RokuAccessory {
    info: DeviceInfo,
    apps: AppIndex,
    settings: AccessorySettings,
    driver: Arc<dyn DeviceDriver>,
    host: Arc<dyn AccessoryHost>,
    state: RwLock<TelevisionState>,
    /// Serializes mute toggles so the check and the keypress act as one step
    mute: Mutex<()>,
}

impl std::fmt::Debug for RokuAccessory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RokuAccessory")
            .field("id", &self.info.serial_number)
            .field("name", &self.info.name)
            .field("apps", &self.apps.len())
            .finish_non_exhaustive()
    }
}

impl RokuAccessory {
    /// Start a session: read the device, build the app index, register with the host
    ///
    /// # Errors
    ///
    /// Returns error if the device info or app list cannot be fetched
    pub async fn connect(
        driver: Arc<dyn DeviceDriver>,
        host: Arc<dyn AccessoryHost>,
        settings: AccessorySettings,
    ) -> Result<Self> {
        let info = driver.device_info().await?;
        Self::connect_with_info(driver, host, settings, info).await
    }

    /// Start a session for a device whose info has already been read
    ///
    /// # Errors
    ///
    /// Returns error if the app list cannot be fetched
    pub async fn connect_with_info(
        driver: Arc<dyn DeviceDriver>,
        host: Arc<dyn AccessoryHost>,
        settings: AccessorySettings,
        info: DeviceInfo,
    ) -> Result<Self> {
        let raw_apps = driver.apps().await?;
        let apps = AppIndex::build(&raw_apps);

        tracing::info!(
            id = %info.serial_number,
            name = %info.name,
            apps = raw_apps.len(),
            "connected to Roku device"
        );

        let state = TelevisionState {
            active: info.power_mode.is_on(),
            active_identifier: apps.home().id,
            muted: false,
        };

        let accessory = Self {
            info,
            apps,
            settings,
            driver,
            host,
            state: RwLock::new(state),
            mute: Mutex::new(()),
        };
        accessory.host.register(&accessory.descriptor());

        Ok(accessory)
    }

    /// Accessory id (device serial number)
    #[must_use]
    pub fn id(&self) -> &str {
        &self.info.serial_number
    }

    /// Device identity captured at connect time
    #[must_use]
    pub const fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// The session's app index
    #[must_use]
    pub const fn apps(&self) -> &AppIndex {
        &self.apps
    }

    /// Input sources offered to the host, excluded apps removed
    #[must_use]
    pub fn inputs(&self) -> Vec<InputSource> {
        self.apps
            .visible(&self.settings.excluded_apps)
            .map(InputSource::from)
            .collect()
    }

    /// Host-facing description of this accessory
    #[must_use]
    pub fn descriptor(&self) -> AccessoryDescriptor {
        AccessoryDescriptor {
            id: self.info.serial_number.clone(),
            name: self.info.name.clone(),
            manufacturer: self.info.vendor_name.clone(),
            model: if self.info.model_number.is_empty() {
                self.info.model_name.clone()
            } else {
                format!("{} ({})", self.info.model_name, self.info.model_number)
            },
            serial_number: self.info.serial_number.clone(),
            firmware_revision: self.info.software_version.clone(),
            inputs: self.inputs(),
        }
    }

    /// Current characteristic values
    pub async fn state(&self) -> TelevisionState {
        *self.state.read().await
    }

    /// Turn the device on or off
    ///
    /// # Errors
    ///
    /// Returns error if the keypress fails
    pub async fn set_active(&self, active: bool) -> Result<()> {
        let key = if active { EcpKey::PowerOn } else { EcpKey::PowerOff };
        self.driver.keypress(key).await?;
        self.apply(CharacteristicUpdate::Active(active)).await;
        Ok(())
    }

    /// Switch to the input with the given identifier
    ///
    /// The home entry presses `Home`; every other entry launches its app.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownInput` if the identifier is not in this session's
    /// index, or an HTTP error if the command fails
    pub async fn set_active_identifier(&self, identifier: i32) -> Result<()> {
        let app = self
            .apps
            .by_numeric_id(identifier)
            .ok_or(Error::UnknownInput(identifier))?;

        tracing::debug!(id = %self.id(), app = %app.name, "switching input");

        if app.is_home() {
            self.driver.keypress(EcpKey::Home).await?;
        } else {
            self.driver.launch(&app.roku_app_id).await?;
        }

        self.apply(CharacteristicUpdate::ActiveIdentifier(app.id)).await;
        Ok(())
    }

    /// Forward a remote control key
    ///
    /// # Errors
    ///
    /// Returns error if the keypress fails
    pub async fn remote_key(&self, key: RemoteKey) -> Result<()> {
        let ecp = key.to_ecp(self.settings.info_button_override);
        tracing::debug!(id = %self.id(), ?key, %ecp, "remote key");
        self.driver.keypress(ecp).await
    }

    /// Step the volume up or down
    ///
    /// # Errors
    ///
    /// Returns error if any keypress fails
    pub async fn set_volume(&self, direction: VolumeDirection) -> Result<()> {
        let (key, presses) = match direction {
            VolumeDirection::Up => (EcpKey::VolumeUp, self.settings.volume_increment),
            VolumeDirection::Down => (EcpKey::VolumeDown, self.settings.volume_decrement),
        };
        for _ in 0..presses {
            self.driver.keypress(key).await?;
        }
        Ok(())
    }

    /// Mute or unmute
    ///
    /// The device only offers a mute toggle, so the key is sent only when the
    /// requested state differs from the tracked one.
    ///
    /// # Errors
    ///
    /// Returns error if the keypress fails
    pub async fn set_mute(&self, muted: bool) -> Result<()> {
        let _toggle = self.mute.lock().await;
        if self.state.read().await.muted == muted {
            return Ok(());
        }
        self.driver.keypress(EcpKey::VolumeMute).await?;
        self.apply(CharacteristicUpdate::Mute(muted)).await;
        Ok(())
    }

    /// Read power and foreground app from the device and push any changes
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be queried
    pub async fn poll(&self) -> Result<()> {
        let info = self.driver.device_info().await?;
        self.apply(CharacteristicUpdate::Active(info.power_mode.is_on()))
            .await;

        let active = self.driver.active_app().await?;
        if let Some(app) = self.resolve_active(active.as_ref().map(|a| a.id.as_str())) {
            self.apply(CharacteristicUpdate::ActiveIdentifier(app.id))
                .await;
        }

        Ok(())
    }

    /// Map the device's foreground app to a host-visible entry
    fn resolve_active(&self, native_id: Option<&str>) -> Option<&MappedApp> {
        let Some(native_id) = native_id else {
            return Some(self.apps.home());
        };

        match self.apps.by_native_id(native_id) {
            Some(app) if self.settings.excluded_apps.contains(&app.name) => {
                tracing::debug!(id = %self.id(), app = %app.name, "active app is excluded");
                None
            }
            Some(app) => Some(app),
            None => {
                // Installed after this session started
                tracing::debug!(id = %self.id(), app_id = %native_id, "active app not in index");
                None
            }
        }
    }

    /// Record a characteristic value, notifying the host when it changed
    async fn apply(&self, update: CharacteristicUpdate) {
        let changed = {
            let mut state = self.state.write().await;
            match update {
                CharacteristicUpdate::Active(v) => replace(&mut state.active, v),
                CharacteristicUpdate::ActiveIdentifier(v) => {
                    replace(&mut state.active_identifier, v)
                }
                CharacteristicUpdate::Mute(v) => replace(&mut state.muted, v),
            }
        };

        if changed {
            self.host.update(self.id(), update);
        }
    }

    /// Poll on a fixed interval until `shutdown` flips to true
    pub fn spawn_poller(
        self: Arc<Self>,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.poll().await {
                            tracing::warn!(id = %self.id(), error = %e, "poll failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            tracing::debug!(id = %self.id(), "poller stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
