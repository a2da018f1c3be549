// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use time::{Duration, OffsetDateTime};
use time::macros::datetime;

use lotkeeper_domain::{Role, format_timestamp};
use lotkeeper_persistence::SqlitePersistence;

use crate::auth::SessionClaims;
use crate::request_response::{CreateBookingRequest, CreateSlotRequest};
use crate::{bookings, slots};

/// Fixed reference instant for deterministic transitions.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-01 10:00:00 UTC)
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("In-memory database should initialize")
}

fn claims_for(user_id: i64, email: &str, role: Role) -> SessionClaims {
    let now = test_now();
    SessionClaims {
        sub: user_id,
        email: email.to_string(),
        role,
        iat: now.unix_timestamp(),
        exp: (now + Duration::days(7)).unix_timestamp(),
    }
}

/// Seeds an admin account and returns its session claims.
pub fn create_admin(persistence: &SqlitePersistence) -> SessionClaims {
    let created_at = format_timestamp(test_now()).expect("Timestamp should format");
    let user_id = persistence
        .create_user(
            "Test Admin",
            "admin@example.com",
            "admin-password",
            Role::Admin,
            &created_at,
        )
        .expect("Admin should be created");
    claims_for(user_id, "admin@example.com", Role::Admin)
}

/// Seeds a regular account and returns its session claims.
pub fn create_user(persistence: &SqlitePersistence, email: &str) -> SessionClaims {
    let created_at = format_timestamp(test_now()).expect("Timestamp should format");
    let user_id = persistence
        .create_user("Test User", email, "user-password", Role::User, &created_at)
        .expect("User should be created");
    claims_for(user_id, email, Role::User)
}

/// Creates an available standard slot at 5.0/hour and returns its id.
pub fn create_slot(
    persistence: &SqlitePersistence,
    admin: &SessionClaims,
    slot_number: &str,
) -> i64 {
    let request = CreateSlotRequest {
        slot_number: slot_number.to_string(),
        slot_type: String::from("standard"),
        floor: String::from("1"),
        section: String::from("A"),
        hourly_rate: 5.0,
        status: None,
    };
    slots::create_slot(persistence, admin, &request, test_now())
        .expect("Slot should be created")
        .slot_id
}

/// Creates a 3-hour booking starting at the reference instant.
pub fn create_booking(
    persistence: &SqlitePersistence,
    owner: &SessionClaims,
    slot_id: i64,
) -> i64 {
    let request = CreateBookingRequest {
        slot_id,
        start_time: format_timestamp(test_now()).expect("Timestamp should format"),
        duration_hours: 3,
    };
    bookings::create_booking(persistence, owner, &request, test_now())
        .expect("Booking should be created")
        .booking_id
}
