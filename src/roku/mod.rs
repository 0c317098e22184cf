//! Roku device access
//!
//! The accessory layer talks to devices through the `DeviceDriver` trait;
//! `RokuClient` is the ECP implementation.

mod client;
pub mod keys;
pub mod types;

use async_trait::async_trait;

pub use client::{ECP_PORT, RokuClient};
pub use keys::{EcpKey, RemoteKey};
pub use types::{DeviceInfo, PowerMode};

use crate::Result;
use crate::apps::RawApp;

/// Operations the bridge needs from a device
#[async_trait]
pub trait DeviceDriver: Send + Sync {
    /// Identity and power state
    async fn device_info(&self) -> Result<DeviceInfo>;

    /// Installed applications
    async fn apps(&self) -> Result<Vec<RawApp>>;

    /// Application in the foreground, `None` on the home screen
    async fn active_app(&self) -> Result<Option<RawApp>>;

    /// Launch an application by its device-native id
    async fn launch(&self, app_id: &str) -> Result<()>;

    /// Press a remote key
    async fn keypress(&self, key: EcpKey) -> Result<()>;
}
