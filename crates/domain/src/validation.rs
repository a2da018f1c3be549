// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation for domain inputs.

use crate::error::DomainError;

/// Minimum booking duration in hours.
pub const MIN_DURATION_HOURS: i64 = 1;

/// Maximum booking duration in hours.
pub const MAX_DURATION_HOURS: i64 = 8;

/// Validates a slot number.
///
/// # Errors
///
/// Returns an error if the slot number is empty or whitespace-only.
pub fn validate_slot_number(slot_number: &str) -> Result<(), DomainError> {
    if slot_number.trim().is_empty() {
        return Err(DomainError::InvalidSlotNumber(String::from(
            "slot number cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an hourly rate.
///
/// # Errors
///
/// Returns an error if the rate is negative or not a finite number.
pub fn validate_hourly_rate(rate: f64) -> Result<(), DomainError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(DomainError::InvalidHourlyRate { rate });
    }
    Ok(())
}

/// Validates a planned booking duration.
///
/// # Errors
///
/// Returns an error if the duration is outside 1–8 hours.
pub fn validate_duration(hours: i64) -> Result<(), DomainError> {
    if !(MIN_DURATION_HOURS..=MAX_DURATION_HOURS).contains(&hours) {
        return Err(DomainError::InvalidDuration { hours });
    }
    Ok(())
}

/// Validates a user name.
///
/// # Errors
///
/// Returns an error if the name is empty or whitespace-only.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates an email address.
///
/// Deliberately shallow: non-empty and contains a separator. Real
/// deliverability is the mail system's problem.
///
/// # Errors
///
/// Returns an error if the email is empty or has no `@`.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "email cannot be empty",
        )));
    }
    if !trimmed.contains('@') {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid email address"
        )));
    }
    Ok(())
}
