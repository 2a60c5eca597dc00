//! Date parsing and day arithmetic for the sales timeline fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

const NAIVE_DATE_TIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses an ISO date or date-time as a UTC instant.
///
/// Date-only values land on UTC midnight. Values without an offset are read
/// as UTC; values with an offset are converted.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|midnight| midnight.and_utc());
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }

    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

/// Absolute distance in days between two raw date fields.
///
/// The result is the millisecond distance divided by the length of a day, so
/// time-of-day components produce fractional days. A missing or unreadable
/// endpoint yields `0.0`.
pub fn day_difference(first: Option<&str>, second: Option<&str>) -> f64 {
    let (Some(first), Some(second)) = (non_empty(first), non_empty(second)) else {
        return 0.0;
    };

    match (parse_instant(first), parse_instant(second)) {
        (Some(start), Some(end)) => {
            let millis = (end - start).num_milliseconds().unsigned_abs();
            millis as f64 / MILLIS_PER_DAY
        }
        _ => {
            warn!(
                event_name = "core.calendar.unreadable_date",
                first = first,
                second = second,
                "date field could not be parsed; treating distance as zero"
            );
            0.0
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
