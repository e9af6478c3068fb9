//! Comfort range detection.
//!
//! A reading is "in range" when it lies within `[floor, ceiling]`, both ends
//! inclusive. The detector is an edge trigger: it reports only when the
//! in-range state differs from the previous one.

/// Default comfort floor in °F.
pub const DEFAULT_FLOOR: f64 = 68.0;

/// Default comfort ceiling in °F.
pub const DEFAULT_CEILING: f64 = 72.0;

/// Check whether `reading` lies in `[floor, ceiling]` and report transitions.
///
/// `on_change` is invoked exactly once, with the new state, when the result
/// differs from `previous_in_range`. It is never invoked otherwise.
///
/// # Returns
///
/// `floor <= reading && reading <= ceiling`, unconditionally.
///
/// # Example
///
/// ```
/// use weather_range::check_temperature_in_range;
///
/// let mut fired = None;
/// let in_range = check_temperature_in_range(65.0, false, 65.0, 73.0, |s| fired = Some(s));
/// assert!(in_range);
/// assert_eq!(fired, Some(true));
/// ```
pub fn check_temperature_in_range<F>(
    reading: f64,
    previous_in_range: bool,
    floor: f64,
    ceiling: f64,
    on_change: F,
) -> bool
where
    F: FnOnce(bool),
{
    let in_range = reading >= floor && reading <= ceiling;
    if in_range != previous_in_range {
        on_change(in_range);
    }
    in_range
}

/// Inclusive temperature band.
///
/// `floor <= ceiling` is assumed but not enforced; an inverted band simply
/// contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortRange {
    /// Lowest in-range temperature.
    pub floor: f64,
    /// Highest in-range temperature.
    pub ceiling: f64,
}

impl ComfortRange {
    /// Create a new range.
    pub fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    /// Check if `reading` is inside the band.
    pub fn contains(&self, reading: f64) -> bool {
        reading >= self.floor && reading <= self.ceiling
    }

    /// Run [`check_temperature_in_range`] against this band.
    pub fn check<F>(&self, reading: f64, previous_in_range: bool, on_change: F) -> bool
    where
        F: FnOnce(bool),
    {
        check_temperature_in_range(reading, previous_in_range, self.floor, self.ceiling, on_change)
    }
}

impl Default for ComfortRange {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR, DEFAULT_CEILING)
    }
}

impl std::fmt::Display for ComfortRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.floor, self.ceiling)
    }
}
