//! Roku Bridge - expose Roku streaming devices as television accessories
//!
//! This library provides the pieces of the bridge:
//! - Application identity mapping (device app ids to stable input identifiers)
//! - Roku External Control Protocol client
//! - SSDP discovery
//! - Television accessory sessions and the host seam they publish through
//! - Platform controller and HTTP API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Host / HTTP API                     │
//! │   register  │  characteristic updates  │  writes    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Roku Bridge                         │
//! │   Platform  │  Accessory  │  App index  │  Poller   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │              Roku devices (ECP :8060)                │
//! │   device-info  │  apps  │  active-app  │  keypress  │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod accessory;
pub mod api;
pub mod apps;
pub mod config;
pub mod discovery;
pub mod error;
pub mod platform;
pub mod roku;

pub use accessory::{
    AccessoryDescriptor, AccessoryHost, AccessorySettings, CharacteristicUpdate, LoggingHost,
    RokuAccessory, TelevisionState, VolumeDirection,
};
pub use apps::{AppIndex, HOME_APP_ID, MappedApp, RawApp, derive_numeric_id};
pub use config::Config;
pub use error::{Error, Result};
pub use platform::Platform;
pub use roku::{DeviceDriver, DeviceInfo, EcpKey, PowerMode, RemoteKey, RokuClient};
