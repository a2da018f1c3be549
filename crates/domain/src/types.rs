// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core domain types for the parking system.
//!
//! Timestamps are carried as ISO 8601 strings; they are parsed into
//! `time::OffsetDateTime` only where arithmetic is required.

use crate::booking_status::BookingStatus;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account roles.
///
/// Roles determine what actions an authenticated user may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular account: may book slots and manage their own bookings
    /// and profile.
    User,
    /// Admin account: may manage slots and users, act on any booking,
    /// and view all bookings and revenue.
    Admin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Returns true for the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// Physical classification of a parking slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Compact,
    Standard,
    Large,
    Handicapped,
    Electric,
}

impl SlotType {
    /// Returns the string representation of the slot type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Large => "large",
            Self::Handicapped => "handicapped",
            Self::Electric => "electric",
        }
    }
}

impl FromStr for SlotType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(Self::Compact),
            "standard" => Ok(Self::Standard),
            "large" => Ok(Self::Large),
            "handicapped" => Ok(Self::Handicapped),
            "electric" => Ok(Self::Electric),
            _ => Err(DomainError::InvalidSlotType(s.to_string())),
        }
    }
}

/// Current status of a parking slot.
///
/// Slot status is the single source of truth for bookability: there is no
/// per-slot calendar of reservations. Status changes are driven by booking
/// transitions, except `Maintenance` which is set administratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    /// Slot may accept a new booking.
    Available,
    /// Slot is held by a pending booking.
    Reserved,
    /// Slot is physically occupied by an active booking.
    Occupied,
    /// Slot is out of service.
    Maintenance,
}

impl SlotStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }
}

impl FromStr for SlotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "reserved" => Ok(Self::Reserved),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(DomainError::InvalidSlotStatus(s.to_string())),
        }
    }
}

/// A registered account.
///
/// The password hash never leaves the credential layer: it is excluded
/// from serialization entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: String,
}

/// A single physical parking space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingSlot {
    pub slot_id: i64,
    pub slot_number: String,
    pub slot_type: SlotType,
    pub floor: String,
    pub section: String,
    pub hourly_rate: f64,
    pub status: SlotStatus,
    pub created_at: String,
    /// The admin account that created the slot.
    pub created_by: i64,
}

impl ParkingSlot {
    /// Checks that this slot can accept a new booking.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotNotBookable` if the slot status is
    /// anything other than `Available`.
    pub fn ensure_bookable(&self) -> Result<(), DomainError> {
        if self.status == SlotStatus::Available {
            Ok(())
        } else {
            Err(DomainError::SlotNotBookable {
                slot_number: self.slot_number.clone(),
                status: self.status.as_str().to_string(),
            })
        }
    }
}

/// A reservation of a slot by a user for a planned duration.
///
/// `fee` is the quoted fee computed from the planned duration at creation.
/// `actual_fee` is the billed fee computed from real elapsed time at
/// check-out. Both are retained for audit and may diverge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub booking_id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: i64,
    pub fee: f64,
    pub status: BookingStatus,
    pub checked_in: bool,
    pub checked_out: bool,
    pub checked_in_at: Option<String>,
    pub checked_out_at: Option<String>,
    pub cancelled_at: Option<String>,
    pub actual_duration_hours: Option<i64>,
    pub actual_fee: Option<f64>,
    pub created_at: String,
}
