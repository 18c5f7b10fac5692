//! Date parsing for request payloads
//!
//! Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` timestamps and
//! plain `YYYY-MM-DD` dates. Values without an offset are taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::DomainError;

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a client-supplied date string into a UTC timestamp
pub fn parse_date(input: &str) -> Result<DateTime<Utc>, DomainError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| DomainError::InvalidDate(input.to_string()))
}

/// Parse an optional date string
pub fn parse_optional_date(input: Option<&str>) -> Result<Option<DateTime<Utc>>, DomainError> {
    input.map(parse_date).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_date("2026-03-10T12:00:00-03:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_utc_with_millis() {
        let dt = parse_date("2026-03-10T12:00:00.250Z").unwrap();
        assert_eq!(dt.timestamp_millis() % 1000, 250);
    }

    #[test]
    fn test_plain_date_is_utc_midnight() {
        let dt = parse_date("2026-02-28").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_naive_datetime() {
        let dt = parse_date(" 2026-02-28T08:30:00 ").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 2, 28, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_dates() {
        assert!(matches!(parse_date("tomorrow"), Err(DomainError::InvalidDate(_))));
        assert!(matches!(parse_date("2026-02-30"), Err(DomainError::InvalidDate(_))));
        assert!(matches!(parse_date(""), Err(DomainError::InvalidDate(_))));
    }

    #[test]
    fn test_optional_date() {
        assert_eq!(parse_optional_date(None), Ok(None));
        assert!(parse_optional_date(Some("2026-01-01")).unwrap().is_some());
        assert!(parse_optional_date(Some("nope")).is_err());
    }
}
