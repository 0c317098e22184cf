//! TOML configuration file loading
//!
//! Supports `~/.config/rokubridge/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct BridgeConfigFile {
    /// Seconds between device state polls
    pub polling_interval_secs: Option<u64>,

    /// Devices to connect to without discovery (host or ECP base URL)
    #[serde(default)]
    pub hosts: Vec<String>,

    /// App names hidden from the input source list
    #[serde(default)]
    pub excluded_apps: Vec<String>,

    /// ECP key to send instead of `Info` (e.g. "Home")
    pub info_button_override: Option<String>,

    /// Key presses per volume-up request
    pub volume_increment: Option<u8>,

    /// Key presses per volume-down request
    pub volume_decrement: Option<u8>,

    /// Network discovery configuration
    #[serde(default)]
    pub discovery: DiscoveryFileConfig,

    /// HTTP API configuration
    #[serde(default)]
    pub api: ApiFileConfig,
}

/// SSDP discovery configuration
#[derive(Debug, Default, Deserialize)]
pub struct DiscoveryFileConfig {
    /// Run SSDP discovery at startup
    pub enabled: Option<bool>,

    /// How long to wait for responses
    pub timeout_secs: Option<u64>,
}

/// HTTP API configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiFileConfig {
    /// Serve the HTTP API
    pub enabled: Option<bool>,

    /// Port to listen on
    pub port: Option<u16>,
}

/// Parse a config file's contents
///
/// # Errors
///
/// Returns error if the contents are not valid TOML for this schema
pub fn parse_config_file(content: &str) -> Result<BridgeConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `BridgeConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> BridgeConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return BridgeConfigFile::default();
    };

    if !path.exists() {
        return BridgeConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                BridgeConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            BridgeConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/rokubridge/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("rokubridge").join("config.toml"))
}
