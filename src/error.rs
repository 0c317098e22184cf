//! Error types for the Roku bridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Roku bridge
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Device discovery error
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Device returned something we could not interpret
    #[error("device error: {0}")]
    Device(String),

    /// Input identifier not present in the session's app index
    #[error("unknown input identifier: {0}")]
    UnknownInput(i32),

    /// Accessory not registered with the bridge
    #[error("accessory not found: {0}")]
    AccessoryNotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// XML decoding error
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Invalid device URL
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
