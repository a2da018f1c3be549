// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fee arithmetic for bookings.
//!
//! The quoted fee is fixed at booking creation from the planned duration.
//! The actual fee is computed at check-out from real elapsed wall-clock
//! time rounded up to whole hours. The two may diverge and both are kept.

use time::OffsetDateTime;

/// Milliseconds per billed hour.
const MS_PER_HOUR: u128 = 3_600_000;

/// Computes the quoted fee for a planned duration.
///
/// Exact product, no rounding: `hourly_rate * duration_hours`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quoted_fee(hourly_rate: f64, duration_hours: i64) -> f64 {
    hourly_rate * duration_hours as f64
}

/// Computes the billed duration between check-in and check-out.
///
/// Elapsed time is rounded up to whole hours. A non-positive elapsed
/// interval bills zero hours.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn actual_duration_hours(checked_in_at: OffsetDateTime, checked_out_at: OffsetDateTime) -> i64 {
    let elapsed_ms: i128 = (checked_out_at - checked_in_at).whole_milliseconds();
    if elapsed_ms <= 0 {
        return 0;
    }
    (elapsed_ms as u128).div_ceil(MS_PER_HOUR) as i64
}

/// Computes the billed fee from the actual duration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn actual_fee(hourly_rate: f64, actual_duration_hours: i64) -> f64 {
    hourly_rate * actual_duration_hours as f64
}
