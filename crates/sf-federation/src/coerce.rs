//! Pure type-coercion helpers for directory attribute values.
//!
//! Directory attributes arrive as strings; these helpers coerce them to
//! their target types and fail with `InvalidFormat` on anything they do
//! not recognize. There are no silent defaults.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{FederationError, FederationResult};

/// Coerces a directory string to a boolean.
///
/// Accepts `1`/`0`, `true`/`false`, `yes`/`no` (case-insensitive).
///
/// ## Errors
///
/// Returns `FederationError::InvalidFormat` for anything else, including
/// the empty string.
pub fn to_bool(attribute: &str, value: &str) -> FederationResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(FederationError::invalid_format(attribute, value)),
    }
}

/// Coerces a directory string to an optional UTC timestamp.
///
/// The empty string encodes "no value" and maps to `None`. Non-empty
/// values must be RFC 3339 (`2024-01-01T00:00:00Z`) or the common
/// space-separated form (`2024-01-01 00:00:00`), interpreted as UTC.
///
/// ## Errors
///
/// Returns `FederationError::InvalidFormat` for unparseable values.
pub fn to_datetime(attribute: &str, value: &str) -> FederationResult<Option<DateTime<Utc>>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(naive.and_utc()));
    }

    Err(FederationError::invalid_format(attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn bool_accepts_known_forms() {
        assert!(to_bool("locked", "1").unwrap());
        assert!(to_bool("locked", "true").unwrap());
        assert!(to_bool("locked", "YES").unwrap());
        assert!(!to_bool("locked", "0").unwrap());
        assert!(!to_bool("locked", "False").unwrap());
        assert!(!to_bool("locked", "no").unwrap());
    }

    #[test]
    fn bool_rejects_everything_else() {
        for bad in ["", "maybe", "2", "enabled"] {
            let err = to_bool("locked", bad).unwrap_err();
            assert!(
                matches!(err, FederationError::InvalidFormat { ref attribute, .. } if attribute == "locked"),
                "expected InvalidFormat for {bad:?}"
            );
        }
    }

    #[test]
    fn datetime_parses_rfc3339() {
        let parsed = to_datetime("last_login", "2024-01-01T00:00:00Z").unwrap();
        assert_eq!(parsed, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn datetime_parses_space_separated() {
        let parsed = to_datetime("verified_at", "2024-06-15 12:30:00").unwrap();
        assert_eq!(
            parsed,
            Some(Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn datetime_empty_means_none() {
        assert_eq!(to_datetime("expires_at", "").unwrap(), None);
        assert_eq!(to_datetime("expires_at", "   ").unwrap(), None);
    }

    #[test]
    fn datetime_rejects_garbage() {
        let err = to_datetime("expires_at", "next tuesday").unwrap_err();
        assert!(matches!(err, FederationError::InvalidFormat { .. }));
    }
}
