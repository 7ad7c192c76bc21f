#![forbid(unsafe_code)]

//! Conversions between host milliseconds and controller durations.

use core::time::Duration;

/// Convert a host-provided millisecond value.
///
/// Host input can be noisy (NaN, infinities, negative values); those yield
/// `None` so the controller clock never moves on garbage.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    let max_secs = Duration::MAX.as_secs_f64();
    let secs = (ms / 1000.0).min(max_secs);
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}

/// Milliseconds as the host reports them.
#[must_use]
pub fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// `setTimeout` delay for `delay`, rounded up so the timer never fires
/// before the deadline it was armed for.
#[must_use]
pub fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_micros().div_ceil(1000)).unwrap_or(i32::MAX)
}
