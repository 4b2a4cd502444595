//! Date normalisation for exported rows.
//!
//! The source system writes dates either as plain ISO dates or as ISO
//! timestamps, depending on the driver that produced the export. Only the
//! calendar date is kept.

use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an exported date, returning `None` for unrecognised input.
///
/// # Examples
///
/// ```
/// use stockledger_importer::parse_date;
///
/// let day = parse_date("2024-01-15T00:00:00").unwrap();
/// assert_eq!(day, parse_date("2024-01-15").unwrap());
/// assert!(parse_date("15 Jan 2024").is_none());
/// ```
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_plain_date() {
        assert_eq!(parse_date("2024-01-15"), Some(jan15()));
        assert_eq!(parse_date("  2024-01-15 "), Some(jan15()));
    }

    #[test]
    fn test_timestamps() {
        assert_eq!(parse_date("2024-01-15T13:45:00"), Some(jan15()));
        assert_eq!(parse_date("2024-01-15 13:45:00"), Some(jan15()));
        assert_eq!(parse_date("2024-01-15 00:00:00.000"), Some(jan15()));
        assert_eq!(parse_date("2024-01-15T23:59:59.123456"), Some(jan15()));
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_date("15/01/2024"), Some(jan15()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("yesterday"), None);
    }
}
