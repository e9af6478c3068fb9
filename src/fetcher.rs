//! Single-device fetch with response classification.

use tracing::warn;

use crate::api::DeviceSource;
use crate::config::ApiKey;
use crate::data::DeviceReading;
use crate::error::{Error, Result};

/// Fetch the one station visible to `key` and its latest reading.
///
/// Errors from `source` are returned unchanged. A rate-limited response
/// yields [`Error::Throttled`] whatever its payload, and any response that
/// does not hold exactly one device yields [`Error::UnexpectedDeviceCount`].
/// Only then is the single device checked for a reading
/// ([`Error::MissingReading`]). There is no retry here; the poll loop's next
/// iteration is the retry.
///
/// Count and missing-reading failures are logged here.
pub async fn fetch_device<S>(source: &S, key: &ApiKey) -> Result<DeviceReading>
where
    S: DeviceSource + ?Sized,
{
    let response = source.fetch_devices(key).await?;

    if response.is_throttled() {
        return Err(Error::Throttled);
    }

    let count = response.devices.len();
    if count != 1 {
        warn!(count, "Did not receive expected count of 1 device");
        return Err(Error::UnexpectedDeviceCount { count });
    }

    let device = response
        .devices
        .into_iter()
        .next()
        .ok_or(Error::UnexpectedDeviceCount { count })?;

    let name = device.name().to_string();
    DeviceReading::from_record(device).ok_or_else(|| {
        warn!(device = %name, "Station reported no feels-like reading");
        Error::MissingReading { device: name }
    })
}
