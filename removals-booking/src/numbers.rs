//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Metres in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Convert metres to miles rounded to one decimal place. Non-finite or
/// negative input yields 0.0.
#[must_use]
pub fn meters_to_miles(meters: f64) -> f64 {
    if !meters.is_finite() || meters <= 0.0 {
        return 0.0;
    }
    (meters / METERS_PER_MILE * 10.0).round() / 10.0
}

/// Convert seconds to whole minutes, rounding up and clamping to the u32 range.
#[must_use]
pub fn seconds_to_minutes(seconds: f64) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let minutes = (seconds / 60.0).ceil().min(max);
    cast::<f64, u32>(minutes).unwrap_or(0)
}
