// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use lotkeeper_domain::DomainError;
use lotkeeper_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Forbidden {
        /// The action that was attempted.
        action: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action } => {
                write!(f, "Forbidden: not permitted to perform '{action}'")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract. The server layer maps each variant to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the caller does not have permission.
    Forbidden {
        /// The action that was attempted.
        action: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A uniqueness rule was violated.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An operation was attempted against a record in the wrong state.
    InvalidState {
        /// A human-readable description of the state violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action } => {
                write!(f, "Forbidden: not permitted to perform '{action}'")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::InvalidState { message } => {
                write!(f, "Invalid state: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden { action } => Self::Forbidden { action },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("password"),
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::UniqueViolation(msg) => Self::Conflict { message: msg },
            PersistenceError::NotFound(msg) => Self::NotFound {
                resource_type: String::from("Record"),
                message: msg,
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidSlotNumber(msg) => ApiError::InvalidInput {
            field: String::from("slot_number"),
            message: msg,
        },
        DomainError::InvalidHourlyRate { rate } => ApiError::InvalidInput {
            field: String::from("hourly_rate"),
            message: format!("Invalid hourly rate: {rate}. Must be a non-negative number"),
        },
        DomainError::InvalidSlotType(value) => ApiError::InvalidInput {
            field: String::from("slot_type"),
            message: format!("Invalid slot type: '{value}'"),
        },
        DomainError::InvalidSlotStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid slot status: '{value}'"),
        },
        DomainError::InvalidBookingStatus(value) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid booking status: '{value}'"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::InvalidState {
            message: format!("Cannot transition booking from '{from}' to '{to}': {reason}"),
        },
        DomainError::SlotNotBookable {
            slot_number,
            status,
        } => ApiError::InvalidState {
            message: format!("Slot '{slot_number}' is not available (status: {status})"),
        },
        DomainError::InvalidDuration { hours } => ApiError::InvalidInput {
            field: String::from("duration_hours"),
            message: format!("Invalid duration: {hours} hours. Must be between 1 and 8"),
        },
        DomainError::InvalidRole(value) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Invalid role: '{value}'"),
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::TimestampParseError { value, error } => ApiError::InvalidInput {
            field: String::from("timestamp"),
            message: format!("Failed to parse timestamp '{value}': {error}"),
        },
        DomainError::TimestampFormatError(msg) => ApiError::Internal {
            message: format!("Failed to format timestamp: {msg}"),
        },
    }
}
