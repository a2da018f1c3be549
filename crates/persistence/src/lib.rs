// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Lotkeeper parking system.
//!
//! This crate provides `SQLite` persistence for user accounts, parking
//! slots, and bookings. It is built directly on `rusqlite`: the schema is
//! created at connection time and all queries are plain SQL.
//!
//! ## Consistency note
//!
//! Booking lifecycle transitions pair a booking write with a slot write.
//! The two statements are intentionally **not** wrapped in a transaction:
//! the API layer issues them as separate calls, mirroring the system this
//! one replaces. The callers serialize access behind a mutex, so the
//! window is theoretical in-process, but a crash between the two writes
//! can still leave a booking and its slot inconsistent.

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
#![allow(clippy::multiple_crate_versions)]

use rusqlite::Connection;
use std::path::Path;

use lotkeeper_domain::{Booking, ParkingSlot, Role, SlotStatus, SlotType, User};

mod bookings;
mod error;
mod schema;
mod slots;
mod users;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use users::verify_password;

/// Persistence adapter for the parking store.
///
/// Wraps a single `SQLite` connection. Callers are expected to serialize
/// access (the server holds this behind a mutex).
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Creates a persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a private database instance, giving tests full
    /// isolation without any shared-cache naming scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;
        schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        // Enable WAL mode for better read concurrency
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

        schema::initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// This is a startup-time check required to ensure referential
    /// integrity constraints are enforced.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&self) -> Result<(), PersistenceError> {
        let foreign_keys_enabled: i32 =
            self.conn
                .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

        if foreign_keys_enabled == 0 {
            return Err(PersistenceError::InitializationError(String::from(
                "Foreign key enforcement is not enabled",
            )));
        }

        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a new user account with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the email is already
    /// registered.
    pub fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        created_at: &str,
    ) -> Result<i64, PersistenceError> {
        users::create_user(&self.conn, name, email, password, role, created_at)
    }

    /// Retrieves a user by email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; `Ok(None)` if not found.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>, PersistenceError> {
        users::get_user_by_email(&self.conn, email)
    }

    /// Retrieves a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; `Ok(None)` if not found.
    pub fn get_user_by_id(&self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        users::get_user_by_id(&self.conn, user_id)
    }

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&self) -> Result<Vec<User>, PersistenceError> {
        users::list_users(&self.conn)
    }

    /// Updates a user's profile fields; `None` leaves a field untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_user(
        &self,
        user_id: i64,
        name: Option<&str>,
        email: Option<&str>,
        role: Option<Role>,
    ) -> Result<(), PersistenceError> {
        users::update_user(&self.conn, user_id, name, email, role)
    }

    /// Deletes a user account.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the user does not exist.
    pub fn delete_user(&self, user_id: i64) -> Result<(), PersistenceError> {
        users::delete_user(&self.conn, user_id)
    }

    /// Counts all user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&self) -> Result<i64, PersistenceError> {
        users::count_users(&self.conn)
    }

    // ========================================================================
    // Parking slots
    // ========================================================================

    /// Creates a new parking slot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the slot number
    /// already exists.
    #[allow(clippy::too_many_arguments)]
    pub fn create_slot(
        &self,
        slot_number: &str,
        slot_type: SlotType,
        floor: &str,
        section: &str,
        hourly_rate: f64,
        status: SlotStatus,
        created_at: &str,
        created_by: i64,
    ) -> Result<i64, PersistenceError> {
        slots::create_slot(
            &self.conn,
            slot_number,
            slot_type,
            floor,
            section,
            hourly_rate,
            status,
            created_at,
            created_by,
        )
    }

    /// Checks whether a slot number is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn slot_number_exists(&self, slot_number: &str) -> Result<bool, PersistenceError> {
        slots::slot_number_exists(&self.conn, slot_number)
    }

    /// Retrieves a slot by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; `Ok(None)` if not found.
    pub fn get_slot(&self, slot_id: i64) -> Result<Option<ParkingSlot>, PersistenceError> {
        slots::get_slot(&self.conn, slot_id)
    }

    /// Lists all slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_slots(&self) -> Result<Vec<ParkingSlot>, PersistenceError> {
        slots::list_all_slots(&self.conn)
    }

    /// Lists all slots with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_slots_by_status(
        &self,
        status: SlotStatus,
    ) -> Result<Vec<ParkingSlot>, PersistenceError> {
        slots::list_slots_by_status(&self.conn, status)
    }

    /// Updates a slot's status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the slot does not exist.
    pub fn update_slot_status(
        &self,
        slot_id: i64,
        status: SlotStatus,
    ) -> Result<(), PersistenceError> {
        slots::update_slot_status(&self.conn, slot_id, status)
    }

    /// Counts all slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_slots(&self) -> Result<i64, PersistenceError> {
        slots::count_slots(&self.conn)
    }

    /// Counts slots with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_slots_by_status(&self, status: SlotStatus) -> Result<i64, PersistenceError> {
        slots::count_slots_by_status(&self.conn, status)
    }

    // ========================================================================
    // Bookings
    // ========================================================================

    /// Inserts a new booking in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_booking(
        &self,
        user_id: i64,
        slot_id: i64,
        start_time: &str,
        end_time: &str,
        duration_hours: i64,
        fee: f64,
        created_at: &str,
    ) -> Result<i64, PersistenceError> {
        bookings::insert_booking(
            &self.conn,
            user_id,
            slot_id,
            start_time,
            end_time,
            duration_hours,
            fee,
            created_at,
        )
    }

    /// Retrieves a booking by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; `Ok(None)` if not found.
    pub fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, PersistenceError> {
        bookings::get_booking(&self.conn, booking_id)
    }

    /// Lists all bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_bookings(&self) -> Result<Vec<Booking>, PersistenceError> {
        bookings::list_all_bookings(&self.conn)
    }

    /// Lists a user's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings_by_user(&self, user_id: i64) -> Result<Vec<Booking>, PersistenceError> {
        bookings::list_bookings_by_user(&self.conn, user_id)
    }

    /// Marks a booking checked in.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the booking does not exist.
    pub fn mark_checked_in(
        &self,
        booking_id: i64,
        checked_in_at: &str,
    ) -> Result<(), PersistenceError> {
        bookings::mark_checked_in(&self.conn, booking_id, checked_in_at)
    }

    /// Marks a booking checked out with its billed duration and fee.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the booking does not exist.
    pub fn mark_checked_out(
        &self,
        booking_id: i64,
        checked_out_at: &str,
        actual_duration_hours: i64,
        actual_fee: f64,
    ) -> Result<(), PersistenceError> {
        bookings::mark_checked_out(
            &self.conn,
            booking_id,
            checked_out_at,
            actual_duration_hours,
            actual_fee,
        )
    }

    /// Marks a booking cancelled.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the booking does not exist.
    pub fn mark_cancelled(
        &self,
        booking_id: i64,
        cancelled_at: &str,
    ) -> Result<(), PersistenceError> {
        bookings::mark_cancelled(&self.conn, booking_id, cancelled_at)
    }

    /// Counts all bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_bookings(&self) -> Result<i64, PersistenceError> {
        bookings::count_bookings(&self.conn)
    }

    /// Counts a user's bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_bookings_by_user(&self, user_id: i64) -> Result<i64, PersistenceError> {
        bookings::count_bookings_by_user(&self.conn, user_id)
    }

    /// Sums the quoted fee across all bookings.
    ///
    /// Revenue deliberately uses the quoted fee, not `actual_fee`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn total_revenue(&self) -> Result<f64, PersistenceError> {
        bookings::total_revenue(&self.conn)
    }

    /// Writes a raw status string, bypassing status normalization.
    ///
    /// Used by tests to simulate rows written by the previous system.
    #[cfg(test)]
    fn raw_set_booking_status(
        &self,
        booking_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        self.conn.execute(
            "UPDATE bookings SET status = ?1 WHERE booking_id = ?2",
            rusqlite::params![status, booking_id],
        )?;
        Ok(())
    }
}
