//! Station device data structures.
//!
//! Mirrors the device-list payload returned by the Ambient Weather REST API.
//! Only the fields this crate acts on are typed; everything else in the
//! payload is ignored during deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent observation reported by a station.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LastData {
    /// Apparent ("feels-like") temperature in °F.
    ///
    /// Absent when the station has not reported recently.
    #[serde(rename = "feelsLike", default)]
    pub feels_like: Option<f64>,

    /// Outdoor air temperature in °F.
    #[serde(default)]
    pub tempf: Option<f64>,

    /// Outdoor relative humidity in percent.
    #[serde(default)]
    pub humidity: Option<f64>,

    /// Observation time as milliseconds since the Unix epoch.
    #[serde(default)]
    pub dateutc: Option<i64>,
}

impl LastData {
    /// Observation time, if the station reported one.
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        self.dateutc.and_then(DateTime::from_timestamp_millis)
    }
}

/// Descriptive information attached to a station.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// User-assigned display name.
    #[serde(default)]
    pub name: String,

    /// User-assigned location label.
    #[serde(default)]
    pub location: Option<String>,
}

/// A single station as listed by the device endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    /// Hardware address identifying the station.
    #[serde(default)]
    pub mac_address: String,

    /// Display metadata.
    #[serde(default)]
    pub info: DeviceInfo,

    /// Latest observation.
    #[serde(default)]
    pub last_data: LastData,
}

impl DeviceRecord {
    /// The station's latest feels-like reading, if it has one.
    pub fn feels_like(&self) -> Option<f64> {
        self.last_data.feels_like
    }

    /// The station's display name.
    pub fn name(&self) -> &str {
        &self.info.name
    }
}

/// A station together with its validated feels-like reading.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceReading {
    /// Feels-like temperature in °F.
    pub feels_like: f64,
    /// The record the reading came from.
    pub device: DeviceRecord,
}

impl DeviceReading {
    /// Pair `device` with its reading, or `None` if it has no reading.
    pub fn from_record(device: DeviceRecord) -> Option<Self> {
        device
            .feels_like()
            .map(|feels_like| Self { feels_like, device })
    }

    /// The station's display name.
    pub fn name(&self) -> &str {
        self.device.name()
    }
}

/// Result of a device-list call: the HTTP status plus any decoded records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceListResponse {
    /// HTTP status code of the response.
    pub http_status: u16,
    /// Device records in the response body.
    pub devices: Vec<DeviceRecord>,
}

impl DeviceListResponse {
    /// HTTP status used by the station API for rate limiting.
    pub const TOO_MANY_REQUESTS: u16 = 429;

    /// Create a successful response carrying `devices`.
    pub fn ok(devices: Vec<DeviceRecord>) -> Self {
        Self {
            http_status: 200,
            devices,
        }
    }

    /// Create a rate-limited response with no devices.
    pub fn throttled() -> Self {
        Self {
            http_status: Self::TOO_MANY_REQUESTS,
            devices: Vec::new(),
        }
    }

    /// Check if the response signals rate limiting.
    pub fn is_throttled(&self) -> bool {
        self.http_status == Self::TOO_MANY_REQUESTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STATION_PAYLOAD: &str = r#"[
        {
            "macAddress": "00:0E:C6:20:0F:7B",
            "lastData": {
                "dateutc": 1515436500000,
                "tempf": 66.9,
                "humidity": 30,
                "feelsLike": 67.4,
                "windspeedmph": 0.9,
                "date": "2018-01-08T18:35:00.000Z"
            },
            "info": {
                "name": "Back Yard",
                "location": "Home"
            }
        }
    ]"#;

    #[test]
    fn test_decode_station_payload() {
        let devices: Vec<DeviceRecord> = serde_json::from_str(STATION_PAYLOAD).unwrap();

        assert_eq!(devices.len(), 1);
        let device = &devices[0];
        assert_eq!(device.mac_address, "00:0E:C6:20:0F:7B");
        assert_eq!(
            device.info,
            DeviceInfo {
                name: "Back Yard".to_string(),
                location: Some("Home".to_string()),
            }
        );
        assert_eq!(device.feels_like(), Some(67.4));
        assert_eq!(device.last_data.tempf, Some(66.9));
        assert_eq!(device.last_data.humidity, Some(30.0));
    }

    #[test]
    fn test_observed_at() {
        let devices: Vec<DeviceRecord> = serde_json::from_str(STATION_PAYLOAD).unwrap();
        let observed = devices[0].last_data.observed_at().unwrap();
        assert_eq!(observed.to_rfc3339(), "2018-01-08T18:35:00+00:00");

        assert_eq!(LastData::default().observed_at(), None);
    }

    #[test]
    fn test_missing_info_defaults() {
        let devices: Vec<DeviceRecord> =
            serde_json::from_str(r#"[{"lastData": {"feelsLike": -3.5}}]"#).unwrap();
        assert_eq!(devices[0].name(), "");
        assert_eq!(devices[0].feels_like(), Some(-3.5));
    }

    #[test]
    fn test_offline_station_decodes_without_reading() {
        let devices: Vec<DeviceRecord> = serde_json::from_str(
            r#"[
                {"macAddress": "AA", "lastData": {"feelsLike": 70.0}, "info": {"name": "Porch"}},
                {"macAddress": "BB", "lastData": {}, "info": {"name": "Shed"}},
                {"macAddress": "CC", "info": {"name": "Attic"}}
            ]"#,
        )
        .unwrap();

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].feels_like(), Some(70.0));
        assert_eq!(devices[1].feels_like(), None);
        assert_eq!(devices[2].last_data, LastData::default());
    }

    #[test]
    fn test_device_reading_requires_value() {
        let mut record = DeviceRecord {
            info: DeviceInfo {
                name: "Porch".to_string(),
                location: None,
            },
            ..Default::default()
        };
        assert_eq!(DeviceReading::from_record(record.clone()), None);

        record.last_data.feels_like = Some(71.5);
        let reading = DeviceReading::from_record(record).unwrap();
        assert_eq!(reading.feels_like, 71.5);
        assert_eq!(reading.name(), "Porch");
    }

    #[test]
    fn test_response_constructors() {
        assert!(DeviceListResponse::throttled().is_throttled());
        assert!(!DeviceListResponse::ok(Vec::new()).is_throttled());
        assert_eq!(DeviceListResponse::default().http_status, 0);
    }
}
