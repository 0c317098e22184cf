//! Device state types and ECP XML decoding

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::apps::RawApp;

/// Power mode reported in device info
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PowerMode {
    /// Screen on and responsive
    On,
    /// Display off or fast-start standby
    Standby,
    /// A mode this bridge does not recognise
    Other(String),
}

impl PowerMode {
    /// Map the device's `power-mode` string
    #[must_use]
    pub fn from_ecp(mode: &str) -> Self {
        match mode {
            "PowerOn" => Self::On,
            "DisplayOff" | "Ready" | "Headless" | "Suspend" => Self::Standby,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the host should show the television as active
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

/// Identity and state of a Roku device
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub serial_number: String,
    pub name: String,
    pub vendor_name: String,
    pub model_name: String,
    pub model_number: String,
    pub software_version: String,
    pub power_mode: PowerMode,
    pub is_tv: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeviceInfoXml {
    serial_number: Option<String>,
    device_id: Option<String>,
    vendor_name: Option<String>,
    model_name: Option<String>,
    model_number: Option<String>,
    user_device_name: Option<String>,
    friendly_device_name: Option<String>,
    software_version: Option<String>,
    power_mode: Option<String>,
    is_tv: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppsXml {
    #[serde(rename = "app", default)]
    apps: Vec<AppXml>,
}

#[derive(Debug, Deserialize)]
struct AppXml {
    #[serde(rename = "@id")]
    id: Option<String>,
    #[serde(rename = "@type", default)]
    app_type: String,
    #[serde(rename = "@version", default)]
    version: String,
    #[serde(rename = "$text", default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ActiveAppXml {
    app: Option<AppXml>,
}

impl AppXml {
    fn into_raw(self) -> Option<RawApp> {
        Some(RawApp {
            id: self.id?,
            name: self.name.trim().to_string(),
            app_type: self.app_type,
            version: self.version,
        })
    }
}

/// Decode `/query/device-info`
///
/// # Errors
///
/// Returns error if the document is not valid XML or lacks a serial number
pub fn parse_device_info(xml: &str) -> Result<DeviceInfo> {
    let raw: DeviceInfoXml = quick_xml::de::from_str(xml)?;

    let serial_number = raw
        .serial_number
        .or(raw.device_id)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| crate::Error::Device("device info has no serial number".to_string()))?;

    let model_name = raw.model_name.unwrap_or_default();
    let name = raw
        .user_device_name
        .or(raw.friendly_device_name)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| {
            if model_name.is_empty() {
                format!("Roku {serial_number}")
            } else {
                model_name.clone()
            }
        });

    Ok(DeviceInfo {
        serial_number,
        name,
        vendor_name: raw.vendor_name.unwrap_or_else(|| "Roku".to_string()),
        model_name,
        model_number: raw.model_number.unwrap_or_default(),
        software_version: raw.software_version.unwrap_or_default(),
        power_mode: PowerMode::from_ecp(raw.power_mode.as_deref().unwrap_or("PowerOn")),
        is_tv: raw.is_tv.is_some_and(|v| v.trim() == "true"),
    })
}

/// Decode `/query/apps`
///
/// Entries without an id are skipped.
///
/// # Errors
///
/// Returns error if the document is not valid XML
pub fn parse_apps(xml: &str) -> Result<Vec<RawApp>> {
    let raw: AppsXml = quick_xml::de::from_str(xml)?;
    Ok(raw.apps.into_iter().filter_map(AppXml::into_raw).collect())
}

/// Decode `/query/active-app`
///
/// The home screen is reported as an `<app>` with no id and yields `None`.
///
/// # Errors
///
/// Returns error if the document is not valid XML
pub fn parse_active_app(xml: &str) -> Result<Option<RawApp>> {
    let raw: ActiveAppXml = quick_xml::de::from_str(xml)?;
    Ok(raw.app.and_then(AppXml::into_raw))
}
