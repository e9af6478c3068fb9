//! REST client for the Ambient Weather device endpoint.
//!
//! Wraps `GET /v1/devices` using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::source::DeviceSource;
use crate::config::ApiKey;
use crate::data::{DeviceListResponse, DeviceRecord};
use crate::error::{Error, Result};

/// Public Ambient Weather REST endpoint.
pub const DEFAULT_API_URL: &str = "https://rt.ambientweather.net";

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the station API.
pub struct AmbientClient {
    client: reqwest::Client,
    api_url: String,
}

impl AmbientClient {
    /// Create a client for `api_url`, e.g. `https://rt.ambientweather.net`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Base URL this client talks to.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn devices_url(&self) -> String {
        format!("{}/v1/devices", self.api_url)
    }
}

#[async_trait]
impl DeviceSource for AmbientClient {
    async fn fetch_devices(&self, key: &ApiKey) -> Result<DeviceListResponse> {
        let response = self
            .client
            .get(self.devices_url())
            .query(&[
                ("applicationKey", key.application_key.as_str()),
                ("apiKey", key.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "Device list response received");

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Ok(DeviceListResponse::throttled());
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let devices: Vec<DeviceRecord> = response.json().await?;
        Ok(DeviceListResponse {
            http_status: status.as_u16(),
            devices,
        })
    }
}
