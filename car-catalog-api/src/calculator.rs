//! Travel-time estimate shared by the API and the client cache.

use crate::models::TravelTime;

/// Hours are persisted as a signed 64-bit integer.
const MAX_HOURS: f64 = i64::MAX as f64;

/// Splits `distance / max_speed` hours into whole hours and rounded minutes.
///
/// A remainder that rounds up to a full hour is carried, so `minutes` is
/// always below 60. Callers guarantee `distance > 0` and `max_speed > 0`.
///
/// Returns `None` when the hour count is not representable as a stored
/// integer, e.g. an astronomically long distance with a slow car.
pub fn travel_time(distance: f64, max_speed: f64) -> Option<TravelTime> {
    let time_in_hours = distance / max_speed;
    if !time_in_hours.is_finite() {
        return None;
    }
    let mut hours = time_in_hours.floor();
    let mut minutes = ((time_in_hours - hours) * 60.0).round();
    if minutes >= 60.0 {
        hours += 1.0;
        minutes = 0.0;
    }
    if hours >= MAX_HOURS {
        return None;
    }

    Some(TravelTime {
        hours: hours as u64,
        minutes: minutes as u32,
    })
}
