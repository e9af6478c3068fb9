//! Station API access.
//!
//! [`DeviceSource`] is the seam between the poll loop and the network;
//! [`AmbientClient`] is the production implementation over HTTPS.

pub mod client;
pub mod source;

pub use client::{AmbientClient, DEFAULT_API_URL};
pub use source::DeviceSource;
