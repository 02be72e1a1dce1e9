use crate::error::AppError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Minute-precision layout the scoreboard endpoint uses, e.g. `2024-09-08T17:00Z`
const ESPN_MINUTE_FORMAT: &str = "%Y-%m-%dT%H:%MZ";
const ESPN_SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses an event start time into UTC.
///
/// Accepts RFC 3339 (any offset) as well as ESPN's `YYYY-MM-DDTHH:MMZ`.
pub fn parse_event_start(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let trimmed = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    [ESPN_MINUTE_FORMAT, ESPN_SECOND_FORMAT]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| AppError::datetime_parse_error(format!("Unrecognized start time '{raw}'")))
}

/// Date in the `YYYYMMDD` form the `dates` query parameter expects
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
