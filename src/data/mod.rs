//! Data structures for station readings.
//!
//! Device payload types as returned by the station API, and the comfort
//! range detector applied to each reading.

pub mod device;
pub mod range;

pub use device::{DeviceInfo, DeviceListResponse, DeviceReading, DeviceRecord, LastData};
pub use range::{check_temperature_in_range, ComfortRange};
