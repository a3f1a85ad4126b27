//! Timeline time/space conversion.
//!
//! The timeline ruler maps milliseconds to horizontal pixels through a single
//! zoom scalar (`range`). Both directions round to the nearest integer, so a
//! round trip may drift by at most one unit in either domain.

/// Default zoom scalar applied to a freshly created timeline view.
pub const DEFAULT_ZOOM_RANGE: f64 = 0.9;

/// Convert a time in milliseconds to a horizontal pixel offset.
///
/// `range` is the zoom scalar: larger values spread the same duration over
/// more pixels.
pub fn ms_to_px(ms: i64, range: f64) -> i64 {
    ((ms as f64 / 5.0) * (range / 4.0)).round() as i64
}

/// Convert a horizontal pixel offset back to a time in milliseconds.
///
/// Inverse of [`ms_to_px`] up to rounding: `px_to_ms(ms_to_px(t))` is within
/// one unit of `t` for any positive `range`.
pub fn px_to_ms(px: i64, range: f64) -> i64 {
    ((px as f64 * 5.0) / (range / 4.0)).round() as i64
}

/// Half-open time window `[start, end)` in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimeWindow {
    /// Inclusive window start.
    pub start: i64,
    /// Exclusive window end.
    pub end: i64,
}

impl TimeWindow {
    /// Whether `t` falls inside the window.
    pub fn contains(&self, t: i64) -> bool {
        t >= self.start && t < self.end
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/time.rs"]
mod tests;
