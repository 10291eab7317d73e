//! Recency evaluation for `max_age` filters.
//!
//! A claim value subject to a `max_age` filter must parse as a timestamp
//! under one of the formats accepted by the identity assurance schema and be
//! strictly younger than the requested age. A value that fails to parse
//! never raises an error; the filter simply does not hold.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::Value;

/// Formats tried after RFC 3339, in order. `%#z` accepts offsets with or
/// without minutes (`+09`, `+0900`, `+09:00`).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%#z", "%Y-%m-%dT%H:%M%#z"];

/// Parse a claim's temporal value into an instant.
///
/// Accepted forms, first success wins:
///
/// 1. RFC 3339 / ISO 8601 date-time with `±hh:mm`, `±hh` or `Z` offset
/// 2. Date-time with compact offset (`±hhmm`)
/// 3. Date-time with minute precision and offset
/// 4. Calendar date (`YYYY-MM-DD`), read as midnight UTC
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight: Option<NaiveDateTime> = date.and_hms_opt(0, 0, 0);
        return midnight.map(|datetime| datetime.and_utc());
    }

    None
}

/// Test whether `actual` holds a timestamp no older than `max_age` seconds
/// before `now`. The comparison is strictly less-than. Non-string values and
/// unparsable timestamps fail the test rather than raising an error.
pub fn is_recent_enough(actual: &Value, max_age: f64, now: DateTime<Utc>) -> bool {
    let Some(raw) = actual.as_str() else {
        return false;
    };

    match parse_instant(raw) {
        Some(instant) => {
            let age = now.signed_duration_since(instant);
            (age.num_milliseconds() as f64 / 1_000.0) < max_age
        }
        None => false,
    }
}
