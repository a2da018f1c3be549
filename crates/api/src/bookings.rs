// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking lifecycle operations.
//!
//! Every transition pairs a booking write with a slot-status write. The
//! two writes are separate statements, not a transaction: a failure
//! between them can leave the pair inconsistent. Callers serialize access,
//! which keeps the window theoretical in-process.
//!
//! All operations take the current time explicitly so transitions are
//! deterministic under test.

use time::{Duration, OffsetDateTime};
use tracing::info;

use lotkeeper_domain::{
    Booking, BookingStatus, ParkingSlot, SlotStatus, actual_duration_hours, actual_fee,
    format_timestamp, parse_timestamp, quoted_fee, validate_duration,
};
use lotkeeper_persistence::SqlitePersistence;

use crate::auth::{AuthorizationService, SessionClaims};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{CheckOutResponse, CreateBookingRequest, CreateBookingResponse};

/// Fetches a booking or fails with `NotFound`.
fn require_booking(
    persistence: &SqlitePersistence,
    booking_id: i64,
) -> Result<Booking, ApiError> {
    persistence
        .get_booking(booking_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Booking"),
            message: format!("Booking {booking_id} does not exist"),
        })
}

/// Fetches a slot or fails with `NotFound`.
fn require_slot(persistence: &SqlitePersistence, slot_id: i64) -> Result<ParkingSlot, ApiError> {
    persistence
        .get_slot(slot_id)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Slot"),
            message: format!("Slot {slot_id} does not exist"),
        })
}

/// Creates a booking against an available slot.
///
/// The booking starts `pending` with a quoted fee of
/// `hourly_rate * duration_hours`, and the slot flips to `reserved`.
///
/// # Errors
///
/// Returns `NotFound` if the slot does not exist, `InvalidState` if the
/// slot is not available, `InvalidInput` on a bad duration or start time.
pub fn create_booking(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    request: &CreateBookingRequest,
    now: OffsetDateTime,
) -> Result<CreateBookingResponse, ApiError> {
    validate_duration(request.duration_hours).map_err(translate_domain_error)?;

    let start: OffsetDateTime =
        parse_timestamp(&request.start_time).map_err(translate_domain_error)?;
    let end: OffsetDateTime = start + Duration::hours(request.duration_hours);

    let slot: ParkingSlot = require_slot(persistence, request.slot_id)?;
    slot.ensure_bookable().map_err(translate_domain_error)?;

    let fee: f64 = quoted_fee(slot.hourly_rate, request.duration_hours);

    let start_time: String = format_timestamp(start).map_err(translate_domain_error)?;
    let end_time: String = format_timestamp(end).map_err(translate_domain_error)?;
    let created_at: String = format_timestamp(now).map_err(translate_domain_error)?;

    let booking_id: i64 = persistence.insert_booking(
        claims.sub,
        slot.slot_id,
        &start_time,
        &end_time,
        request.duration_hours,
        fee,
        &created_at,
    )?;
    // Second write of the pair; not atomic with the insert above.
    persistence.update_slot_status(slot.slot_id, SlotStatus::Reserved)?;

    info!(booking_id, slot_id = slot.slot_id, user_id = claims.sub, "Booking created");

    Ok(CreateBookingResponse {
        message: String::from("Booking created"),
        booking_id,
        fee,
    })
}

/// Checks a pending booking in: booking goes `active`, slot `occupied`.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is neither owner nor admin,
/// `InvalidState` if the booking is not pending, `NotFound` if absent.
pub fn check_in(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    booking_id: i64,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    let booking: Booking = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_owner_or_admin(claims, booking.user_id, "check_in")?;

    booking
        .status
        .validate_transition(BookingStatus::Active)
        .map_err(translate_domain_error)?;

    let checked_in_at: String = format_timestamp(now).map_err(translate_domain_error)?;
    persistence.mark_checked_in(booking_id, &checked_in_at)?;
    persistence.update_slot_status(booking.slot_id, SlotStatus::Occupied)?;

    info!(booking_id, "Booking checked in");
    Ok(())
}

/// Checks an active booking out: booking goes `completed`, slot
/// `available`, and the billed fee is computed from real elapsed time.
///
/// Elapsed time is measured from `checked_in_at`, falling back to the
/// planned start time if the check-in timestamp is missing.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is neither owner nor admin,
/// `InvalidState` if the booking is not active, `NotFound` if absent.
pub fn check_out(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    booking_id: i64,
    now: OffsetDateTime,
) -> Result<CheckOutResponse, ApiError> {
    let booking: Booking = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_owner_or_admin(claims, booking.user_id, "check_out")?;

    booking
        .status
        .validate_transition(BookingStatus::Completed)
        .map_err(translate_domain_error)?;

    let slot: ParkingSlot = require_slot(persistence, booking.slot_id)?;

    let billing_start: &str = booking
        .checked_in_at
        .as_deref()
        .unwrap_or(&booking.start_time);
    let checked_in: OffsetDateTime =
        parse_timestamp(billing_start).map_err(translate_domain_error)?;

    let hours: i64 = actual_duration_hours(checked_in, now);
    let billed: f64 = actual_fee(slot.hourly_rate, hours);

    let checked_out_at: String = format_timestamp(now).map_err(translate_domain_error)?;
    persistence.mark_checked_out(booking_id, &checked_out_at, hours, billed)?;
    persistence.update_slot_status(booking.slot_id, SlotStatus::Available)?;

    info!(booking_id, actual_duration_hours = hours, "Booking checked out");

    Ok(CheckOutResponse {
        message: String::from("Booking completed"),
        actual_duration_hours: hours,
        actual_fee: billed,
    })
}

/// Cancels a pending booking: booking goes `cancelled`, slot `available`.
///
/// # Errors
///
/// Returns `Forbidden` if the caller is neither owner nor admin,
/// `InvalidState` if the booking is not pending, `NotFound` if absent.
pub fn cancel_booking(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
    booking_id: i64,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    let booking: Booking = require_booking(persistence, booking_id)?;
    AuthorizationService::authorize_owner_or_admin(claims, booking.user_id, "cancel_booking")?;

    booking
        .status
        .validate_transition(BookingStatus::Cancelled)
        .map_err(translate_domain_error)?;

    let cancelled_at: String = format_timestamp(now).map_err(translate_domain_error)?;
    persistence.mark_cancelled(booking_id, &cancelled_at)?;
    persistence.update_slot_status(booking.slot_id, SlotStatus::Available)?;

    info!(booking_id, "Booking cancelled");
    Ok(())
}

/// Lists bookings visible to the caller: admins see all, others see
/// their own. Newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_bookings(
    persistence: &SqlitePersistence,
    claims: &SessionClaims,
) -> Result<Vec<Booking>, ApiError> {
    if claims.is_admin() {
        Ok(persistence.list_all_bookings()?)
    } else {
        Ok(persistence.list_bookings_by_user(claims.sub)?)
    }
}
