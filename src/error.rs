//! Error types for the weather-range crate.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The remote device call failed before producing a response.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the failure, passed through from the source.
        message: String,
    },

    /// HTTP-level failure from the underlying client library.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The station API answered with a non-success status other than 429.
    #[error("Station API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The station API rate-limited the request (HTTP 429).
    #[error("Request was throttled")]
    Throttled,

    /// The response did not contain exactly one device.
    #[error("Invalid device count: expected 1, got {count}")]
    UnexpectedDeviceCount {
        /// Number of devices actually received.
        count: usize,
    },

    /// The single station in the response carries no feels-like reading.
    #[error("Station {device:?} reported no feels-like reading")]
    MissingReading {
        /// Display name of the station.
        device: String,
    },

    /// A required environment variable is missing or empty.
    #[error("Missing required environment variable: {name}")]
    MissingVariable {
        /// The variable name.
        name: String,
    },

    /// An environment variable could not be parsed.
    #[error("Invalid value for {name}: {value}")]
    InvalidVariable {
        /// The variable name.
        name: String,
        /// The value that failed to parse.
        value: String,
    },
}

impl Error {
    /// Create a transport error from any displayable message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Check if this error came from the remote call itself.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Http(_) | Self::Api { .. })
    }

    /// Check if this error signals rate limiting.
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled)
    }

    /// Check if this error comes from startup configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingVariable { .. } | Self::InvalidVariable { .. }
        )
    }
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
