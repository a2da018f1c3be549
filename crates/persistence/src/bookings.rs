// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking persistence functions.
//!
//! Booking status strings are normalized through `BookingStatus` on read,
//! so legacy `reserved` rows surface as `pending`.

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PersistenceError;
use lotkeeper_domain::{Booking, BookingStatus};

const BOOKING_COLUMNS: &str = "booking_id, user_id, slot_id, start_time, end_time, \
     duration_hours, fee, status, checked_in, checked_out, checked_in_at, checked_out_at, \
     cancelled_at, actual_duration_hours, actual_fee, created_at";

/// Maps a `bookings` row to a domain `Booking`.
fn map_booking_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(7)?;
    let status: BookingStatus = BookingStatus::from_str(&status_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Booking {
        booking_id: row.get(0)?,
        user_id: row.get(1)?,
        slot_id: row.get(2)?,
        start_time: row.get(3)?,
        end_time: row.get(4)?,
        duration_hours: row.get(5)?,
        fee: row.get(6)?,
        status,
        checked_in: row.get::<_, i64>(8)? != 0,
        checked_out: row.get::<_, i64>(9)? != 0,
        checked_in_at: row.get(10)?,
        checked_out_at: row.get(11)?,
        cancelled_at: row.get(12)?,
        actual_duration_hours: row.get(13)?,
        actual_fee: row.get(14)?,
        created_at: row.get(15)?,
    })
}

/// Inserts a new booking in `pending` status.
///
/// # Errors
///
/// Returns an error if the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_booking(
    conn: &Connection,
    user_id: i64,
    slot_id: i64,
    start_time: &str,
    end_time: &str,
    duration_hours: i64,
    fee: f64,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    conn.execute(
        "INSERT INTO bookings
            (user_id, slot_id, start_time, end_time, duration_hours, fee, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user_id,
            slot_id,
            start_time,
            end_time,
            duration_hours,
            fee,
            BookingStatus::Pending.as_str(),
            created_at
        ],
    )?;

    let booking_id: i64 = conn.last_insert_rowid();
    info!(booking_id, user_id, slot_id, "Created booking");

    Ok(booking_id)
}

/// Retrieves a booking by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the booking is not found.
pub fn get_booking(
    conn: &Connection,
    booking_id: i64,
) -> Result<Option<Booking>, PersistenceError> {
    let result: Option<Booking> = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_id = ?1"),
            params![booking_id],
            map_booking_row,
        )
        .optional()?;

    Ok(result)
}

/// Lists all bookings, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_bookings(conn: &Connection) -> Result<Vec<Booking>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC, booking_id DESC"
    ))?;
    let rows = stmt.query_map([], map_booking_row)?;

    let mut bookings: Vec<Booking> = Vec::new();
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// Lists a user's bookings, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_bookings_by_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<Booking>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE user_id = ?1 ORDER BY created_at DESC, booking_id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_booking_row)?;

    let mut bookings: Vec<Booking> = Vec::new();
    for row in rows {
        bookings.push(row?);
    }
    Ok(bookings)
}

/// Marks a booking checked in.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the booking does not exist.
pub fn mark_checked_in(
    conn: &Connection,
    booking_id: i64,
    checked_in_at: &str,
) -> Result<(), PersistenceError> {
    let affected: usize = conn.execute(
        "UPDATE bookings
         SET status = ?1, checked_in = 1, checked_in_at = ?2
         WHERE booking_id = ?3",
        params![BookingStatus::Active.as_str(), checked_in_at, booking_id],
    )?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Booking {booking_id} not found"
        )));
    }

    debug!(booking_id, "Marked booking checked in");
    Ok(())
}

/// Marks a booking checked out with its billed duration and fee.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the booking does not exist.
pub fn mark_checked_out(
    conn: &Connection,
    booking_id: i64,
    checked_out_at: &str,
    actual_duration_hours: i64,
    actual_fee: f64,
) -> Result<(), PersistenceError> {
    let affected: usize = conn.execute(
        "UPDATE bookings
         SET status = ?1, checked_out = 1, checked_out_at = ?2,
             actual_duration_hours = ?3, actual_fee = ?4
         WHERE booking_id = ?5",
        params![
            BookingStatus::Completed.as_str(),
            checked_out_at,
            actual_duration_hours,
            actual_fee,
            booking_id
        ],
    )?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Booking {booking_id} not found"
        )));
    }

    debug!(booking_id, actual_duration_hours, "Marked booking checked out");
    Ok(())
}

/// Marks a booking cancelled.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the booking does not exist.
pub fn mark_cancelled(
    conn: &Connection,
    booking_id: i64,
    cancelled_at: &str,
) -> Result<(), PersistenceError> {
    let affected: usize = conn.execute(
        "UPDATE bookings
         SET status = ?1, cancelled_at = ?2
         WHERE booking_id = ?3",
        params![BookingStatus::Cancelled.as_str(), cancelled_at, booking_id],
    )?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Booking {booking_id} not found"
        )));
    }

    debug!(booking_id, "Marked booking cancelled");
    Ok(())
}

/// Counts all bookings.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_bookings(conn: &Connection) -> Result<i64, PersistenceError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))?;
    Ok(count)
}

/// Counts a user's bookings.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_bookings_by_user(conn: &Connection, user_id: i64) -> Result<i64, PersistenceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Sums the quoted fee across all bookings.
///
/// Revenue deliberately uses the quoted fee, not `actual_fee`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn total_revenue(conn: &Connection) -> Result<f64, PersistenceError> {
    let total: f64 = conn.query_row(
        "SELECT COALESCE(SUM(fee), 0.0) FROM bookings",
        [],
        |row| row.get(0),
    )?;
    Ok(total)
}
