//! HTTP client for the Roku External Control Protocol

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::DeviceDriver;
use super::keys::EcpKey;
use super::types::{DeviceInfo, parse_active_app, parse_apps, parse_device_info};
use crate::apps::RawApp;
use crate::{Error, Result};

/// Port the ECP server listens on
pub const ECP_PORT: u16 = 8060;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// ECP client bound to one device
#[derive(Debug, Clone)]
pub struct RokuClient {
    client: reqwest::Client,
    base: Url,
}

impl RokuClient {
    /// Create a client for a bare host (`192.168.1.20`) or a full base URL
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be turned into a URL
    pub fn new(address: &str) -> Result<Self> {
        let base = if address.contains("://") {
            Url::parse(address)?
        } else {
            Url::parse(&format!("http://{address}:{ECP_PORT}/"))?
        };

        if base.cannot_be_a_base() {
            return Err(Error::Config(format!("not a base URL: {address}")));
        }

        // Devices are on the local network
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .no_proxy()
            .build()?;

        Ok(Self { client, base })
    }

    /// Base URL of the device
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Host portion of the base URL
    #[must_use]
    pub fn host(&self) -> &str {
        self.base.host_str().unwrap_or_default()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("not a base URL: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn query(&self, what: &str) -> Result<String> {
        let url = self.endpoint(&["query", what])?;
        tracing::trace!(%url, "ECP query");
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn post(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "ECP command");
        self.client.post(url).send().await?.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl DeviceDriver for RokuClient {
    async fn device_info(&self) -> Result<DeviceInfo> {
        parse_device_info(&self.query("device-info").await?)
    }

    async fn apps(&self) -> Result<Vec<RawApp>> {
        parse_apps(&self.query("apps").await?)
    }

    async fn active_app(&self) -> Result<Option<RawApp>> {
        parse_active_app(&self.query("active-app").await?)
    }

    async fn launch(&self, app_id: &str) -> Result<()> {
        self.post(&["launch", app_id]).await
    }

    async fn keypress(&self, key: EcpKey) -> Result<()> {
        self.post(&["keypress", key.as_str()]).await
    }
}
