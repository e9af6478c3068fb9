//! The injectable remote-call seam.

use async_trait::async_trait;

use crate::config::ApiKey;
use crate::data::DeviceListResponse;
use crate::error::Result;

/// Something that can list the devices visible to an API key.
///
/// Implementations report the HTTP status alongside the records and leave
/// classification (throttling, device count) to
/// [`fetch_device`](crate::fetcher::fetch_device). An `Err` means the call
/// itself failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceSource: Send + Sync {
    /// Fetch the device list.
    async fn fetch_devices(&self, key: &ApiKey) -> Result<DeviceListResponse>;
}
