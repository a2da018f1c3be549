// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account persistence functions.

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::PersistenceError;
use lotkeeper_domain::{Role, User};

/// Maps a `users` row to a domain `User`.
fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(4)?;
    let role: Role = Role::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(User {
        user_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role,
        created_at: row.get(5)?,
    })
}

const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, created_at";

/// Creates a new user account with a bcrypt-hashed password.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the email is already
/// registered, or another error if hashing or the insert fails.
pub fn create_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    info!(email, role = role.as_str(), "Creating user");

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    conn.execute(
        "INSERT INTO users (name, email, password_hash, role, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, email, password_hash, role.as_str(), created_at],
    )?;

    let user_id: i64 = conn.last_insert_rowid();
    info!(user_id, "Created user");

    Ok(user_id)
}

/// Retrieves a user by email address (case-insensitive).
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no user has this email.
pub fn get_user_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<User>, PersistenceError> {
    debug!(email, "Looking up user by email");

    let result: Option<User> = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user_row,
        )
        .optional()?;

    Ok(result)
}

/// Retrieves a user by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>, PersistenceError> {
    let result: Option<User> = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
            params![user_id],
            map_user_row,
        )
        .optional()?;

    Ok(result)
}

/// Lists all users, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &Connection) -> Result<Vec<User>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, user_id DESC"
    ))?;
    let rows = stmt.query_map([], map_user_row)?;

    let mut users: Vec<User> = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

/// Updates a user's profile fields.
///
/// Only the fields provided are changed; `None` leaves the stored value
/// untouched.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the user does not exist, or
/// `UniqueViolation` if the new email is already taken.
pub fn update_user(
    conn: &Connection,
    user_id: i64,
    name: Option<&str>,
    email: Option<&str>,
    role: Option<Role>,
) -> Result<(), PersistenceError> {
    if let Some(name) = name {
        conn.execute(
            "UPDATE users SET name = ?1 WHERE user_id = ?2",
            params![name, user_id],
        )?;
    }
    if let Some(email) = email {
        conn.execute(
            "UPDATE users SET email = ?1 WHERE user_id = ?2",
            params![email, user_id],
        )?;
    }
    if let Some(role) = role {
        conn.execute(
            "UPDATE users SET role = ?1 WHERE user_id = ?2",
            params![role.as_str(), user_id],
        )?;
    }

    debug!(user_id, "Updated user");
    Ok(())
}

/// Deletes a user account.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the user does not exist.
pub fn delete_user(conn: &Connection, user_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = conn.execute("DELETE FROM users WHERE user_id = ?1", params![user_id])?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "User {user_id} not found"
        )));
    }

    info!(user_id, "Deleted user");
    Ok(())
}

/// Counts all user accounts.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &Connection) -> Result<i64, PersistenceError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))
}
