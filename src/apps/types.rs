//! Application record types

use serde::{Deserialize, Serialize};

/// Reserved raw identifier for the synthesized home screen entry
pub const HOME_APP_ID: &str = "home.id";

/// An application as reported by the device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawApp {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub version: String,
}

impl RawApp {
    /// The home screen entry, which the device never reports in its app list
    #[must_use]
    pub fn home() -> Self {
        Self {
            id: HOME_APP_ID.to_string(),
            name: "Home".to_string(),
            app_type: "Home".to_string(),
            version: "1".to_string(),
        }
    }
}

/// An application with its derived numeric input identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedApp {
    /// Numeric identifier exposed to the host as the input source identifier
    pub id: i32,
    /// Identifier used to address the app on the device
    pub roku_app_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: String,
    pub version: String,
}

impl MappedApp {
    /// Whether this is the synthesized home screen entry
    #[must_use]
    pub fn is_home(&self) -> bool {
        self.roku_app_id == HOME_APP_ID
    }
}
