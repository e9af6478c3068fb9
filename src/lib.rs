//! # weather-range
//!
//! Watches an Ambient Weather station's "feels-like" temperature and
//! reports, through a single boolean callback, each time it crosses into or
//! out of a comfort band `[floor, ceiling]` (both ends inclusive).
//!
//! The pieces:
//!
//! - **Range detection**: [`check_temperature_in_range`] is a pure edge
//!   detector over one reading and the previous in-range state.
//! - **Fetching**: [`fetch_device`] calls a [`DeviceSource`] and maps
//!   throttling and unexpected device counts to typed errors.
//! - **Polling**: [`RangeMonitor`] runs fetch and detection on a fixed
//!   interval, keeping its state local to the loop.
//!
//! State is in-memory only and starts as "unknown" on every run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weather_range::{AmbientClient, Config, RangeMonitor, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::from_env()?;
//!     let client = AmbientClient::new(config.api_url.clone())?;
//!
//!     RangeMonitor::from_config(client, &config)
//!         .run(|in_range| println!("in range: {in_range}"))
//!         .await;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod fetcher;
pub mod monitor;

// Re-exports for convenience
pub use api::{AmbientClient, DeviceSource};
pub use config::{ApiKey, Config};
pub use data::{
    check_temperature_in_range, ComfortRange, DeviceInfo, DeviceListResponse, DeviceReading,
    DeviceRecord, LastData,
};
pub use error::{Error, Result};
pub use fetcher::fetch_device;
pub use monitor::{MonitorState, PollReport, RangeMonitor, ThrottlePolicy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _ = std::any::TypeId::of::<AmbientClient>();
        let _ = std::any::TypeId::of::<Config>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<DeviceRecord>();
        let _ = std::any::TypeId::of::<MonitorState>();
        let _ = std::any::TypeId::of::<ComfortRange>();
    }
}
