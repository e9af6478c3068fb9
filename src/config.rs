//! Startup configuration.
//!
//! Everything is read once from environment variables and is immutable for
//! the lifetime of the process.
//!
//! | Variable                    | Required | Default                         |
//! |-----------------------------|----------|---------------------------------|
//! | `AMBIENT_APPLICATION_KEY`   | yes      | --                              |
//! | `AMBIENT_API_KEY`           | yes      | --                              |
//! | `FLOOR_TEMPERATURE`         | no       | `68.0`                          |
//! | `CEILING_TEMPERATURE`       | no       | `72.0`                          |
//! | `POLL_INTERVAL_SECS`        | no       | `60`                            |
//! | `AMBIENT_API_URL`           | no       | `https://rt.ambientweather.net` |
//! | `THROTTLE_BACKOFF_MAX_SECS` | no       | unset (fixed interval)          |

use std::str::FromStr;
use std::time::Duration;

use crate::api::DEFAULT_API_URL;
use crate::data::range::{ComfortRange, DEFAULT_CEILING, DEFAULT_FLOOR};
use crate::error::{Error, Result};
use crate::monitor::ThrottlePolicy;

/// Application key variable.
pub const APPLICATION_KEY_VAR: &str = "AMBIENT_APPLICATION_KEY";
/// API key variable.
pub const API_KEY_VAR: &str = "AMBIENT_API_KEY";
/// Comfort floor variable.
pub const FLOOR_VAR: &str = "FLOOR_TEMPERATURE";
/// Comfort ceiling variable.
pub const CEILING_VAR: &str = "CEILING_TEMPERATURE";
/// Poll interval variable, in seconds.
pub const POLL_INTERVAL_VAR: &str = "POLL_INTERVAL_SECS";
/// Station API base URL variable.
pub const API_URL_VAR: &str = "AMBIENT_API_URL";
/// Maximum throttle backoff variable, in seconds.
pub const THROTTLE_BACKOFF_VAR: &str = "THROTTLE_BACKOFF_MAX_SECS";

/// Default poll interval in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Credentials for the station API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Per-application key issued to developers.
    pub application_key: String,
    /// Per-account key granting access to the user's devices.
    pub api_key: String,
}

impl ApiKey {
    /// Create a new key pair.
    pub fn new(application_key: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            application_key: application_key.into(),
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("application_key", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Station API credentials.
    pub key: ApiKey,
    /// Comfort band.
    pub range: ComfortRange,
    /// Delay between polls.
    pub poll_interval: Duration,
    /// Station API base URL.
    pub api_url: String,
    /// What to do after a throttled request.
    pub throttle_policy: ThrottlePolicy,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingVariable`] if a required key is absent and
    /// [`Error::InvalidVariable`] if a numeric value does not parse, a bound
    /// is not finite, or the poll interval is zero.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = ApiKey::new(
            required(&lookup, APPLICATION_KEY_VAR)?,
            required(&lookup, API_KEY_VAR)?,
        );

        let floor = finite(FLOOR_VAR, parsed(&lookup, FLOOR_VAR)?.unwrap_or(DEFAULT_FLOOR))?;
        let ceiling = finite(
            CEILING_VAR,
            parsed(&lookup, CEILING_VAR)?.unwrap_or(DEFAULT_CEILING),
        )?;

        let poll_secs: u64 =
            parsed(&lookup, POLL_INTERVAL_VAR)?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(Error::InvalidVariable {
                name: POLL_INTERVAL_VAR.to_string(),
                value: poll_secs.to_string(),
            });
        }

        let api_url = lookup(API_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let throttle_policy = match parsed::<u64, _>(&lookup, THROTTLE_BACKOFF_VAR)? {
            Some(secs) => ThrottlePolicy::Backoff {
                max: Duration::from_secs(secs),
            },
            None => ThrottlePolicy::Fixed,
        };

        Ok(Self {
            key,
            range: ComfortRange::new(floor, ceiling),
            poll_interval: Duration::from_secs(poll_secs),
            api_url,
            throttle_policy,
        })
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::MissingVariable {
            name: name.to_string(),
        })
}

/// Temperature bounds must be real numbers; `NaN` would never be in range.
fn finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidVariable {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn parsed<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidVariable {
                name: name.to_string(),
                value: raw,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    const KEYS: [(&str, &str); 2] = [(APPLICATION_KEY_VAR, "ABC"), (API_KEY_VAR, "DEF")];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&KEYS)).unwrap();

        assert_eq!(
            config,
            Config {
                key: ApiKey::new("ABC", "DEF"),
                range: ComfortRange::new(68.0, 72.0),
                poll_interval: Duration::from_secs(60),
                api_url: DEFAULT_API_URL.to_string(),
                throttle_policy: ThrottlePolicy::Fixed,
            }
        );
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            KEYS[0],
            KEYS[1],
            (FLOOR_VAR, "65"),
            (CEILING_VAR, " 73.5 "),
            (POLL_INTERVAL_VAR, "15"),
            (API_URL_VAR, "http://localhost:8080/"),
            (THROTTLE_BACKOFF_VAR, "600"),
        ]))
        .unwrap();

        assert_eq!(config.range, ComfortRange::new(65.0, 73.5));
        assert_eq!(config.poll_interval, Duration::from_secs(15));
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(
            config.throttle_policy,
            ThrottlePolicy::Backoff {
                max: Duration::from_secs(600)
            }
        );
    }

    #[test]
    fn test_missing_application_key() {
        let err = Config::from_lookup(lookup(&[KEYS[1]])).unwrap_err();
        assert!(matches!(err, Error::MissingVariable { ref name } if name == APPLICATION_KEY_VAR));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let err = Config::from_lookup(lookup(&[KEYS[0], (API_KEY_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, Error::MissingVariable { ref name } if name == API_KEY_VAR));
    }

    #[test]
    fn test_invalid_floor() {
        let err =
            Config::from_lookup(lookup(&[KEYS[0], KEYS[1], (FLOOR_VAR, "warm")])).unwrap_err();
        match err {
            Error::InvalidVariable { name, value } => {
                assert_eq!(name, FLOOR_VAR);
                assert_eq!(value, "warm");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_interval_rejected() {
        let err = Config::from_lookup(lookup(&[KEYS[0], KEYS[1], (POLL_INTERVAL_VAR, "-5")]))
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_api_key_debug_redacts() {
        let debug = format!("{:?}", ApiKey::new("secret-app", "secret-api"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::from_lookup(lookup(&[KEYS[0], KEYS[1], (POLL_INTERVAL_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidVariable { ref name, .. } if name == POLL_INTERVAL_VAR
        ));
    }

    #[test]
    fn test_non_finite_bounds_rejected() {
        for (var, raw) in [
            (FLOOR_VAR, "NaN"),
            (FLOOR_VAR, "-inf"),
            (CEILING_VAR, "inf"),
            (CEILING_VAR, "nan"),
        ] {
            let err = Config::from_lookup(lookup(&[KEYS[0], KEYS[1], (var, raw)])).unwrap_err();
            assert!(
                matches!(err, Error::InvalidVariable { ref name, .. } if name == var),
                "{var}={raw} should be rejected, got {err}"
            );
        }
    }
}
