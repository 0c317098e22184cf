//! Host platform seam
//!
//! The bridge never reaches for host objects directly; each accessory is given
//! an `AccessoryHost` to register itself with and to push characteristic
//! changes through.

use serde::Serialize;

use crate::apps::MappedApp;

/// Category of an input source as presented to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSourceType {
    HomeScreen,
    Application,
    Hdmi,
    Tuner,
    Other,
}

impl InputSourceType {
    /// Classify a mapped app by its device-reported type
    #[must_use]
    pub fn of(app: &MappedApp) -> Self {
        if app.is_home() {
            return Self::HomeScreen;
        }
        match app.app_type.as_str() {
            "appl" | "menu" => Self::Application,
            "tvin" if app.roku_app_id.starts_with("tvinput.hdmi") => Self::Hdmi,
            "tvin" => Self::Tuner,
            _ => Self::Other,
        }
    }
}

/// One selectable input on a television accessory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSource {
    pub identifier: i32,
    pub name: String,
    pub source_type: InputSourceType,
}

impl From<&MappedApp> for InputSource {
    fn from(app: &MappedApp) -> Self {
        Self {
            identifier: app.id,
            name: app.name.clone(),
            source_type: InputSourceType::of(app),
        }
    }
}

/// Everything the host needs to publish a television accessory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessoryDescriptor {
    /// Stable accessory id (the device serial number)
    pub id: String,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_revision: String,
    pub inputs: Vec<InputSource>,
}

/// A characteristic value change pushed to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "characteristic", content = "value", rename_all = "snake_case")]
pub enum CharacteristicUpdate {
    Active(bool),
    ActiveIdentifier(i32),
    Mute(bool),
}

/// Host platform the accessories are published to
pub trait AccessoryHost: Send + Sync {
    /// Publish a new accessory
    fn register(&self, accessory: &AccessoryDescriptor);

    /// Push a characteristic change for a published accessory
    fn update(&self, accessory_id: &str, update: CharacteristicUpdate);
}

/// Host that records accessory activity in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHost;

impl AccessoryHost for LoggingHost {
    fn register(&self, accessory: &AccessoryDescriptor) {
        tracing::info!(
            id = %accessory.id,
            name = %accessory.name,
            model = %accessory.model,
            inputs = accessory.inputs.len(),
            "registered television accessory"
        );
        for input in &accessory.inputs {
            tracing::debug!(
                id = %accessory.id,
                identifier = input.identifier,
                name = %input.name,
                source_type = ?input.source_type,
                "input source"
            );
        }
    }

    fn update(&self, accessory_id: &str, update: CharacteristicUpdate) {
        tracing::info!(id = %accessory_id, ?update, "characteristic updated");
    }
}
