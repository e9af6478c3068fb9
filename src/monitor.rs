//! Poll loop driving fetch and range detection.
//!
//! [`RangeMonitor`] owns the device source and the configuration; the
//! mutable state between polls lives in a [`MonitorState`] owned by the
//! loop itself and threaded through each iteration.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::api::DeviceSource;
use crate::config::{ApiKey, Config};
use crate::data::ComfortRange;
use crate::error::{Error, Result};
use crate::fetcher::fetch_device;

/// Delay used after a throttled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottlePolicy {
    /// Sleep the normal poll interval, same as any other failure.
    #[default]
    Fixed,
    /// Double the delay for each consecutive throttle, capped at `max`.
    Backoff {
        /// Upper bound on the delay.
        max: Duration,
    },
}

impl ThrottlePolicy {
    /// Delay before the next poll after `consecutive_throttles` throttled
    /// requests in a row.
    ///
    /// Never shorter than `interval`.
    pub fn next_delay(&self, interval: Duration, consecutive_throttles: u32) -> Duration {
        match *self {
            Self::Fixed => interval,
            Self::Backoff { max } => {
                if consecutive_throttles == 0 {
                    return interval;
                }
                let factor = 2u32.checked_pow(consecutive_throttles).unwrap_or(u32::MAX);
                interval
                    .checked_mul(factor)
                    .map_or(max, |d| d.min(max))
                    .max(interval)
            }
        }
    }
}

/// State carried from one poll to the next.
///
/// Starts out unknown on every process start: no previous reading and
/// "not in range".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonitorState {
    /// Last successfully fetched reading.
    pub last_reading: Option<f64>,
    /// Whether the last reading was inside the comfort band.
    pub in_range: bool,
    /// Throttled requests since the last non-throttled outcome.
    pub consecutive_throttles: u32,
}

/// What a successful poll observed.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    /// Station display name.
    pub device_name: String,
    /// Reading from the previous successful poll.
    pub previous_reading: Option<f64>,
    /// Reading from this poll.
    pub reading: f64,
    /// Whether `reading` is inside the band.
    pub in_range: bool,
    /// Whether the in-range state changed (the callback fired).
    pub changed: bool,
}

/// Polls a single station and reports comfort-range transitions.
pub struct RangeMonitor<S> {
    source: S,
    key: ApiKey,
    range: ComfortRange,
    poll_interval: Duration,
    throttle_policy: ThrottlePolicy,
}

impl<S: DeviceSource> RangeMonitor<S> {
    /// Create a monitor with the default poll interval and throttle policy.
    pub fn new(source: S, key: ApiKey, range: ComfortRange) -> Self {
        Self {
            source,
            key,
            range,
            poll_interval: Duration::from_secs(crate::config::DEFAULT_POLL_INTERVAL_SECS),
            throttle_policy: ThrottlePolicy::Fixed,
        }
    }

    /// Create a monitor from loaded configuration.
    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source, config.key.clone(), config.range)
            .with_poll_interval(config.poll_interval)
            .with_throttle_policy(config.throttle_policy)
    }

    /// Set the delay between polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the throttle policy.
    pub fn with_throttle_policy(mut self, throttle_policy: ThrottlePolicy) -> Self {
        self.throttle_policy = throttle_policy;
        self
    }

    /// The comfort band being watched.
    pub fn range(&self) -> ComfortRange {
        self.range
    }

    /// The configured poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one fetch-and-detect iteration without sleeping.
    ///
    /// On success `state` is updated and `on_change` fires if the reading
    /// crossed the band edge. On failure `state` keeps its reading and
    /// in-range flag; only the throttle counter moves.
    pub async fn poll_once<F>(
        &self,
        state: &mut MonitorState,
        on_change: &mut F,
    ) -> Result<PollReport>
    where
        F: FnMut(bool),
    {
        let fetched = match fetch_device(&self.source, &self.key).await {
            Ok(fetched) => fetched,
            Err(e) => {
                if e.is_throttled() {
                    state.consecutive_throttles = state.consecutive_throttles.saturating_add(1);
                } else {
                    state.consecutive_throttles = 0;
                }
                return Err(e);
            }
        };
        state.consecutive_throttles = 0;

        let reading = fetched.feels_like;
        let mut changed = false;
        let in_range = self.range.check(reading, state.in_range, |now_in_range| {
            changed = true;
            on_change(now_in_range);
        });

        info!(
            device = %fetched.name(),
            previous = ?state.last_reading,
            current = reading,
            in_range,
            "Reading received"
        );

        let report = PollReport {
            device_name: fetched.device.info.name,
            previous_reading: state.last_reading,
            reading,
            in_range,
            changed,
        };

        state.last_reading = Some(reading);
        state.in_range = in_range;

        Ok(report)
    }

    /// Delay before the next poll given the current state.
    pub fn next_delay(&self, state: &MonitorState) -> Duration {
        self.throttle_policy
            .next_delay(self.poll_interval, state.consecutive_throttles)
    }

    /// Poll forever.
    pub async fn run<F>(&self, on_change: F)
    where
        F: FnMut(bool),
    {
        self.run_until(std::future::pending::<()>(), on_change).await;
    }

    /// Poll until `shutdown` resolves, returning the final state.
    ///
    /// Failures are logged and the loop carries on after the next delay.
    pub async fn run_until<Fut, F>(&self, shutdown: Fut, mut on_change: F) -> MonitorState
    where
        Fut: Future<Output = ()>,
        F: FnMut(bool),
    {
        tokio::pin!(shutdown);

        let mut state = MonitorState::default();

        info!(
            range = %self.range,
            interval_secs = self.poll_interval.as_secs(),
            "Starting range monitor"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                result = self.poll_once(&mut state, &mut on_change) => {
                    if let Err(e) = result {
                        log_poll_error(&e);
                    }
                }
            }

            let delay = self.next_delay(&state);
            debug!(delay_ms = delay.as_millis() as u64, "Sleeping until next poll");

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!("Range monitor stopped");
        state
    }
}

/// Failures that [`fetch_device`] has already logged with their details.
fn logged_by_fetcher(e: &Error) -> bool {
    matches!(
        e,
        Error::UnexpectedDeviceCount { .. } | Error::MissingReading { .. }
    )
}

fn log_poll_error(e: &Error) {
    if logged_by_fetcher(e) {
        debug!(error = %e, "Skipping poll");
        return;
    }
    match e {
        Error::Throttled => warn!("Request was throttled"),
        other => error!(error = %other, "Failed to fetch device"),
    }
}
