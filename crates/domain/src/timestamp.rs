// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp formatting and parsing helpers.
//!
//! All persisted timestamps are ISO 8601 strings in UTC.

use crate::error::DomainError;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Formats a timestamp for storage as an ISO 8601 string.
///
/// # Errors
///
/// Returns `DomainError::TimestampFormatError` if formatting fails.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, DomainError> {
    value
        .format(&Iso8601::DEFAULT)
        .map_err(|e| DomainError::TimestampFormatError(e.to_string()))
}

/// Parses a stored ISO 8601 timestamp string.
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if the string is not a
/// valid ISO 8601 timestamp.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Iso8601::DEFAULT).map_err(|e| DomainError::TimestampParseError {
        value: value.to_string(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_timestamp_round_trip() {
        let original = datetime!(2026-03-01 10:30:00 UTC);
        let formatted = format_timestamp(original).unwrap();
        let parsed = parse_timestamp(&formatted).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("not-a-timestamp").is_err());
        assert!(parse_timestamp("").is_err());
    }
}
