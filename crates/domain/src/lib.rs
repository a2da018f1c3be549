// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod booking_status;
mod error;
mod fees;
mod timestamp;
mod types;
mod validation;

pub use booking_status::BookingStatus;
pub use error::DomainError;
pub use fees::{actual_duration_hours, actual_fee, quoted_fee};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use types::{Booking, ParkingSlot, Role, SlotStatus, SlotType, User};
pub use validation::{
    MAX_DURATION_HOURS, MIN_DURATION_HOURS, validate_duration, validate_email,
    validate_hourly_rate, validate_name, validate_slot_number,
};
