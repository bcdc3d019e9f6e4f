//! Parsing and validation of untrusted user input
//!
//! Every numeric or date value that reaches the ledger from the outside
//! (command line, restored documents) passes through one of these
//! functions first.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::error::{MilkError, MilkResult};

/// Accepted layouts for a measurement timestamp
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a quantity of milk in kilograms
pub fn parse_quantity(raw: &str) -> MilkResult<f64> {
    parse_positive(raw, "Please enter a valid milk quantity")
}

/// Parse a price per kilogram
pub fn parse_price(raw: &str) -> MilkResult<f64> {
    parse_positive(raw, "Please enter a valid milk price")
}

/// Parse an animal count; a blank value means a single animal
pub fn parse_animal_count(raw: &str) -> MilkResult<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(1);
    }

    match raw.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(MilkError::Validation(format!(
            "Animal count must be a whole number of at least 1, got '{}'",
            raw
        ))),
    }
}

/// Parse a measurement timestamp (date and time of day).
///
/// A bare date is read as midnight of that day.
pub fn parse_timestamp(raw: &str) -> MilkResult<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MilkError::Validation(
            "Please select a date and time".into(),
        ));
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(MilkError::Validation(format!(
        "Invalid date/time '{}'. Use YYYY-MM-DDTHH:MM or YYYY-MM-DD",
        raw
    )))
}

/// Parse a timestamp read back from a stored document.
///
/// Besides the local layouts accepted by [`parse_timestamp`], RFC 3339
/// values with an offset (as written by older versions) are converted to
/// local wall-clock time.
pub fn parse_stored_timestamp(raw: &str) -> MilkResult<NaiveDateTime> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Ok(ts.with_timezone(&Local).naive_local());
    }
    parse_timestamp(raw)
}

/// Parse a calendar date (YYYY-MM-DD)
pub fn parse_date(raw: &str) -> MilkResult<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MilkError::Validation(
            "Please select start and end dates".into(),
        ));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        MilkError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
    })
}

fn parse_positive(raw: &str, message: &str) -> MilkResult<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(MilkError::Validation(format!("{}: '{}'", message, raw.trim()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("12.5").unwrap(), 12.5);
        assert_eq!(parse_quantity(" 3 ").unwrap(), 3.0);
        assert!(parse_quantity("0").unwrap_err().is_validation());
        assert!(parse_quantity("-4").is_err());
        assert!(parse_quantity("abc").is_err());
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("NaN").is_err());
        assert!(parse_quantity("inf").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("0.45").unwrap(), 0.45);
        assert!(parse_price("0").is_err());
    }

    #[test]
    fn test_parse_animal_count() {
        assert_eq!(parse_animal_count("").unwrap(), 1);
        assert_eq!(parse_animal_count("4").unwrap(), 4);
        assert!(parse_animal_count("0").is_err());
        assert!(parse_animal_count("-2").is_err());
        assert!(parse_animal_count("two").is_err());
        assert!(parse_animal_count("1.5").is_err());
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let ts = parse_timestamp("2024-01-01T06:30").unwrap();
        assert_eq!((ts.hour(), ts.minute()), (6, 30));

        let ts = parse_timestamp("2024-01-01 18:05:10").unwrap();
        assert_eq!(ts.second(), 10);

        let ts = parse_timestamp("2024-02-29").unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour()), (2, 29, 0));

        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_stored_timestamp_accepts_rfc3339() {
        let ts = parse_stored_timestamp("2024-01-01T08:30:00.000Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-01T08:30:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(ts, expected);

        let naive = parse_stored_timestamp("2024-01-01T08:30:00").unwrap();
        assert_eq!(naive.hour(), 8);
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("2024-03-01").unwrap();
        assert_eq!(date.month(), 3);
        assert!(parse_date("01/03/2024").is_err());
        assert!(parse_date(" ").is_err());
    }
}
