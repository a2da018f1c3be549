// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            user_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL CHECK(role IN ('user', 'admin')),
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_users_email
            ON users(email);

        CREATE TABLE IF NOT EXISTS parking_slots (
            slot_id INTEGER PRIMARY KEY AUTOINCREMENT,
            slot_number TEXT NOT NULL UNIQUE,
            slot_type TEXT NOT NULL
                CHECK(slot_type IN ('compact', 'standard', 'large', 'handicapped', 'electric')),
            floor TEXT NOT NULL,
            section TEXT NOT NULL,
            hourly_rate REAL NOT NULL CHECK(hourly_rate >= 0),
            status TEXT NOT NULL
                CHECK(status IN ('available', 'reserved', 'occupied', 'maintenance')),
            created_at TEXT NOT NULL,
            created_by INTEGER NOT NULL,
            FOREIGN KEY(created_by) REFERENCES users(user_id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS bookings (
            booking_id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            slot_id INTEGER NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            duration_hours INTEGER NOT NULL,
            fee REAL NOT NULL,
            status TEXT NOT NULL
                CHECK(status IN ('pending', 'reserved', 'active', 'cancelled', 'completed')),
            checked_in INTEGER NOT NULL DEFAULT 0 CHECK(checked_in IN (0, 1)),
            checked_out INTEGER NOT NULL DEFAULT 0 CHECK(checked_out IN (0, 1)),
            checked_in_at TEXT,
            checked_out_at TEXT,
            cancelled_at TEXT,
            actual_duration_hours INTEGER,
            actual_fee REAL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(user_id) ON DELETE CASCADE,
            FOREIGN KEY(slot_id) REFERENCES parking_slots(slot_id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_bookings_user
            ON bookings(user_id);

        CREATE INDEX IF NOT EXISTS idx_bookings_slot
            ON bookings(slot_id);

        CREATE INDEX IF NOT EXISTS idx_bookings_created
            ON bookings(created_at);
        ",
    )?;

    Ok(())
}
