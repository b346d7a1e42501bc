//! Booking amount computation.
//!
//! Durations are rounded up to whole billing units and charged at the spot's hourly rate:
//!
//! `amount = ceil(duration / unit) * unit_hours * hourly_rate`
//!
//! With the default one-hour unit this is simply `ceil(hours) * hourly_rate`.
//! For units that are not whole hours the final amount is rounded up to the next cent.

use chrono::Duration;

use crate::{error::AppError, models::booking::BookingWindow};

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_HOUR: i128 = 3600 * NANOS_PER_SECOND;

/// Exact length of `duration` in nanoseconds.
fn total_nanos(duration: Duration) -> i128 {
    i128::from(duration.num_seconds()) * NANOS_PER_SECOND + i128::from(duration.subsec_nanos())
}

/// Number of billing units needed to cover `duration`, rounding up.
///
/// Returns 0 for non-positive durations or a non-positive unit.
pub fn billing_units(duration: Duration, unit: Duration) -> i64 {
    let duration_ns = total_nanos(duration);
    let unit_ns = total_nanos(unit);
    if duration_ns <= 0 || unit_ns <= 0 {
        return 0;
    }
    // Ceiling division on positive values
    let units = (duration_ns + unit_ns - 1) / unit_ns;
    i64::try_from(units).unwrap_or(i64::MAX)
}

/// Amount in cents owed for booking `window` at `hourly_rate_cents`.
///
/// # Errors
///
/// `InvalidRequest` if the rate is not positive, `InvalidWindow` if the amount does not fit in `i64`.
pub fn compute_amount(
    window: &BookingWindow,
    unit: Duration,
    hourly_rate_cents: i64,
) -> Result<i64, AppError> {
    if hourly_rate_cents <= 0 {
        return Err(AppError::InvalidRequest(
            "Hourly rate must be positive".to_string(),
        ));
    }

    let units = i128::from(billing_units(window.duration(), unit));
    let numerator = units
        .checked_mul(total_nanos(unit))
        .and_then(|n| n.checked_mul(i128::from(hourly_rate_cents)))
        .ok_or_else(|| AppError::InvalidWindow("booking amount is too large".to_string()))?;
    let amount = (numerator + NANOS_PER_HOUR - 1) / NANOS_PER_HOUR;

    i64::try_from(amount)
        .map_err(|_| AppError::InvalidWindow("booking amount is too large".to_string()))
}
