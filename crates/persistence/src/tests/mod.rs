// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.


use crate::SqlitePersistence;
use lotkeeper_domain::{Role, SlotStatus, SlotType};

pub const TEST_TIMESTAMP: &str = "2026-03-01T09:00:00.000000000Z";

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("In-memory database should initialize")
}

/// Creates an admin user and returns its id, for slot foreign keys.
pub fn create_test_admin(persistence: &SqlitePersistence) -> i64 {
    persistence
        .create_user(
            "Test Admin",
            "admin@example.com",
            "admin-password",
            Role::Admin,
            TEST_TIMESTAMP,
        )
        .expect("Admin user should be created")
}

/// Creates a regular user and returns its id.
pub fn create_test_user(persistence: &SqlitePersistence, email: &str) -> i64 {
    persistence
        .create_user("Test User", email, "user-password", Role::User, TEST_TIMESTAMP)
        .expect("User should be created")
}

/// Creates an available standard slot and returns its id.
pub fn create_test_slot(persistence: &SqlitePersistence, slot_number: &str, admin_id: i64) -> i64 {
    persistence
        .create_slot(
            slot_number,
            SlotType::Standard,
            "1",
            "A",
            5.0,
            SlotStatus::Available,
            TEST_TIMESTAMP,
            admin_id,
        )
        .expect("Slot should be created")
}
