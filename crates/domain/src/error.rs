// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Slot number is empty or invalid.
    InvalidSlotNumber(String),
    /// Hourly rate is negative or not a finite number.
    InvalidHourlyRate {
        /// The invalid rate value.
        rate: f64,
    },
    /// Slot type string is not a recognized type.
    InvalidSlotType(String),
    /// Slot status string is not a recognized status.
    InvalidSlotStatus(String),
    /// Booking status string is not a recognized status.
    InvalidBookingStatus(String),
    /// A booking status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// A slot cannot accept a new booking in its current status.
    SlotNotBookable {
        /// The slot number.
        slot_number: String,
        /// The slot's current status.
        status: String,
    },
    /// Booking duration is outside the permitted range.
    InvalidDuration {
        /// The invalid duration in hours.
        hours: i64,
    },
    /// Role string is not a recognized role.
    InvalidRole(String),
    /// User name is empty or invalid.
    InvalidName(String),
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Failed to parse a timestamp from its stored string form.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to format a timestamp for storage.
    TimestampFormatError(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlotNumber(msg) => write!(f, "Invalid slot number: {msg}"),
            Self::InvalidHourlyRate { rate } => {
                write!(f, "Invalid hourly rate: {rate}. Must be a non-negative number")
            }
            Self::InvalidSlotType(value) => write!(f, "Invalid slot type: '{value}'"),
            Self::InvalidSlotStatus(value) => write!(f, "Invalid slot status: '{value}'"),
            Self::InvalidBookingStatus(value) => {
                write!(f, "Invalid booking status: '{value}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition booking from '{from}' to '{to}': {reason}")
            }
            Self::SlotNotBookable {
                slot_number,
                status,
            } => {
                write!(f, "Slot '{slot_number}' is not available (status: {status})")
            }
            Self::InvalidDuration { hours } => {
                write!(f, "Invalid duration: {hours} hours. Must be between 1 and 8")
            }
            Self::InvalidRole(value) => write!(f, "Invalid role: '{value}'"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
            Self::TimestampFormatError(msg) => {
                write!(f, "Failed to format timestamp: {msg}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
