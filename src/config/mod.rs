//! Configuration management for the Roku bridge

pub mod file;

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::accessory::AccessorySettings;
use crate::roku::EcpKey;
use crate::{Error, Result};

use file::BridgeConfigFile;

/// Default seconds between polls
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 30;

/// Default SSDP response window
pub const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 3;

/// Default HTTP API port
pub const DEFAULT_API_PORT: u16 = 8061;

/// Roku bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval between device state polls
    pub polling_interval: Duration,

    /// Devices to connect to in addition to discovered ones
    pub hosts: Vec<String>,

    /// Network discovery configuration
    pub discovery: DiscoveryConfig,

    /// Per-accessory behaviour
    pub accessory: AccessorySettings,

    /// HTTP API server configuration
    pub api_server: ApiServerConfig,
}

/// SSDP discovery configuration
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Run discovery at startup
    pub enabled: bool,

    /// How long to collect responses
    pub timeout: Duration,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Serve the API
    pub enabled: bool,

    /// Port to listen on
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
            hosts: Vec::new(),
            discovery: DiscoveryConfig {
                enabled: true,
                timeout: Duration::from_secs(DEFAULT_DISCOVERY_TIMEOUT_SECS),
            },
            accessory: AccessorySettings::default(),
            api_server: ApiServerConfig {
                enabled: true,
                port: DEFAULT_API_PORT,
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment and the config file
    ///
    /// Priority: env > toml > default. `path` overrides the standard file location.
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(path);
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment values from `env`
    ///
    /// # Errors
    ///
    /// Returns error if a value is present but invalid
    pub fn from_sources(
        fc: BridgeConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let polling_secs = env_parse(&env, "ROKU_BRIDGE_POLLING_INTERVAL")?
            .or(fc.polling_interval_secs)
            .unwrap_or(DEFAULT_POLLING_INTERVAL_SECS);
        if polling_secs == 0 {
            return Err(Error::Config(
                "polling interval must be at least one second".to_string(),
            ));
        }

        let hosts = env("ROKU_BRIDGE_HOSTS").map_or(fc.hosts, |v| split_list(&v));

        let excluded_apps: HashSet<String> = env("ROKU_BRIDGE_EXCLUDED_APPS")
            .map_or(fc.excluded_apps, |v| split_list(&v))
            .into_iter()
            .collect();

        let info_button_override = env("ROKU_BRIDGE_INFO_BUTTON")
            .or(fc.info_button_override)
            .map(|key| key.parse::<EcpKey>().map_err(Error::Config))
            .transpose()?;

        let volume_increment = env_parse(&env, "ROKU_BRIDGE_VOLUME_INCREMENT")?
            .or(fc.volume_increment)
            .unwrap_or(defaults.accessory.volume_increment);
        let volume_decrement = env_parse(&env, "ROKU_BRIDGE_VOLUME_DECREMENT")?
            .or(fc.volume_decrement)
            .unwrap_or(defaults.accessory.volume_decrement);

        let discovery = DiscoveryConfig {
            enabled: env_parse(&env, "ROKU_BRIDGE_DISCOVERY")?
                .or(fc.discovery.enabled)
                .unwrap_or(defaults.discovery.enabled),
            timeout: env_parse(&env, "ROKU_BRIDGE_DISCOVERY_TIMEOUT")?
                .or(fc.discovery.timeout_secs)
                .map_or(defaults.discovery.timeout, Duration::from_secs),
        };

        let api_server = ApiServerConfig {
            enabled: env_parse(&env, "ROKU_BRIDGE_API_ENABLED")?
                .or(fc.api.enabled)
                .unwrap_or(defaults.api_server.enabled),
            port: env_parse(&env, "ROKU_BRIDGE_API_PORT")?
                .or(fc.api.port)
                .unwrap_or(defaults.api_server.port),
        };

        Ok(Self {
            polling_interval: Duration::from_secs(polling_secs),
            hosts,
            discovery,
            accessory: AccessorySettings {
                excluded_apps,
                info_button_override,
                volume_increment,
                volume_decrement,
            },
            api_server,
        })
    }
}

fn env_parse<T: std::str::FromStr>(
    env: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    env(key)
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::Config(format!("invalid value for {key}: {v}")))
        })
        .transpose()
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
