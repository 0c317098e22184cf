//! Local network discovery of Roku devices

pub mod ssdp;

pub use ssdp::{DiscoveredDevice, discover};
