// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Parking slot persistence functions.

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PersistenceError;
use lotkeeper_domain::{ParkingSlot, SlotStatus, SlotType};

const SLOT_COLUMNS: &str =
    "slot_id, slot_number, slot_type, floor, section, hourly_rate, status, created_at, created_by";

/// Maps a `parking_slots` row to a domain `ParkingSlot`.
fn map_slot_row(row: &Row<'_>) -> rusqlite::Result<ParkingSlot> {
    let type_str: String = row.get(2)?;
    let slot_type: SlotType = SlotType::from_str(&type_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let status_str: String = row.get(6)?;
    let status: SlotStatus = SlotStatus::from_str(&status_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(ParkingSlot {
        slot_id: row.get(0)?,
        slot_number: row.get(1)?,
        slot_type,
        floor: row.get(3)?,
        section: row.get(4)?,
        hourly_rate: row.get(5)?,
        status,
        created_at: row.get(7)?,
        created_by: row.get(8)?,
    })
}

/// Creates a new parking slot.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the slot number already
/// exists.
#[allow(clippy::too_many_arguments)]
pub fn create_slot(
    conn: &Connection,
    slot_number: &str,
    slot_type: SlotType,
    floor: &str,
    section: &str,
    hourly_rate: f64,
    status: SlotStatus,
    created_at: &str,
    created_by: i64,
) -> Result<i64, PersistenceError> {
    info!(
        slot_number,
        slot_type = slot_type.as_str(),
        status = status.as_str(),
        "Creating parking slot"
    );

    conn.execute(
        "INSERT INTO parking_slots
            (slot_number, slot_type, floor, section, hourly_rate, status, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            slot_number,
            slot_type.as_str(),
            floor,
            section,
            hourly_rate,
            status.as_str(),
            created_at,
            created_by
        ],
    )?;

    let slot_id: i64 = conn.last_insert_rowid();
    info!(slot_id, "Created parking slot");

    Ok(slot_id)
}

/// Checks whether a slot number is already registered.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn slot_number_exists(conn: &Connection, slot_number: &str) -> Result<bool, PersistenceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM parking_slots WHERE slot_number = ?1",
        params![slot_number],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Retrieves a slot by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the slot is not found.
pub fn get_slot(conn: &Connection, slot_id: i64) -> Result<Option<ParkingSlot>, PersistenceError> {
    let result: Option<ParkingSlot> = conn
        .query_row(
            &format!("SELECT {SLOT_COLUMNS} FROM parking_slots WHERE slot_id = ?1"),
            params![slot_id],
            map_slot_row,
        )
        .optional()?;

    Ok(result)
}

/// Lists all slots, ordered by slot number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_all_slots(conn: &Connection) -> Result<Vec<ParkingSlot>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM parking_slots ORDER BY slot_number ASC"
    ))?;
    let rows = stmt.query_map([], map_slot_row)?;

    let mut slots: Vec<ParkingSlot> = Vec::new();
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

/// Lists all slots with the given status, ordered by slot number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_slots_by_status(
    conn: &Connection,
    status: SlotStatus,
) -> Result<Vec<ParkingSlot>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SLOT_COLUMNS} FROM parking_slots WHERE status = ?1 ORDER BY slot_number ASC"
    ))?;
    let rows = stmt.query_map(params![status.as_str()], map_slot_row)?;

    let mut slots: Vec<ParkingSlot> = Vec::new();
    for row in rows {
        slots.push(row?);
    }
    Ok(slots)
}

/// Updates a slot's status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the slot does not exist.
pub fn update_slot_status(
    conn: &Connection,
    slot_id: i64,
    status: SlotStatus,
) -> Result<(), PersistenceError> {
    let affected: usize = conn.execute(
        "UPDATE parking_slots SET status = ?1 WHERE slot_id = ?2",
        params![status.as_str(), slot_id],
    )?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Slot {slot_id} not found"
        )));
    }

    debug!(slot_id, status = status.as_str(), "Updated slot status");
    Ok(())
}

/// Counts all slots.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_slots(conn: &Connection) -> Result<i64, PersistenceError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM parking_slots", [], |row| row.get(0))?;
    Ok(count)
}

/// Counts slots with the given status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_slots_by_status(
    conn: &Connection,
    status: SlotStatus,
) -> Result<i64, PersistenceError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM parking_slots WHERE status = ?1",
        params![status.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}
