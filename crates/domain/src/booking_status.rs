// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking status tracking and transition logic.
//!
//! This module defines booking lifecycle states and valid transitions.
//! Transitions are caller-initiated only; the system never advances a
//! booking based on time alone.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Booking lifecycle states.
///
/// A booking starts as `Pending` when created against an available slot,
/// becomes `Active` at check-in, and ends as `Completed` at check-out or
/// `Cancelled` if withdrawn before check-in.
///
/// The stored value `reserved` is a legacy synonym for `Pending`: older
/// records used both interchangeably, so parsing accepts either and
/// normalizes to `Pending`. Only `pending` is ever written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Slot is reserved but the user has not checked in.
    Pending,
    /// User has checked in and occupies the slot.
    Active,
    /// Booking was withdrawn before check-in.
    Cancelled,
    /// User has checked out; actual duration and fee are recorded.
    Completed,
}

impl BookingStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// Accepts the legacy value `reserved` and normalizes it to `Pending`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidBookingStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" | "reserved" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// Permitted transitions:
    /// - `Pending` → `Active` (check-in)
    /// - `Pending` → `Cancelled` (cancel)
    /// - `Active` → `Completed` (check-out)
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::Pending => matches!(new_status, Self::Active | Self::Cancelled),
            Self::Active => matches!(new_status, Self::Completed),
            Self::Cancelled | Self::Completed => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by booking lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}
