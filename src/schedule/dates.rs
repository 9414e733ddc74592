use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::error::StatusError;

/// Local date-time layouts accepted when the input carries no offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a race date into the configured offset.
///
/// Inputs with an explicit offset are converted; naive inputs are read as wall
/// clock time in `offset`; a bare date means midnight in `offset`.
pub fn parse_race_date(input: &str, offset: FixedOffset) -> Result<DateTime<FixedOffset>, StatusError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(StatusError::MissingDate);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&offset));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return at_local(offset, naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return at_local(offset, date.and_time(NaiveTime::MIN));
    }

    Err(StatusError::InvalidDate(trimmed.to_string()))
}

/// Attach `offset` to a local wall-clock time.
pub(crate) fn at_local(
    offset: FixedOffset,
    naive: NaiveDateTime,
) -> Result<DateTime<FixedOffset>, StatusError> {
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| StatusError::OutOfRange(naive.to_string()))
}

/// Parse a UTC offset such as `+00:00`, `-03:00`, `+0530` or `Z`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset, String> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| format!("UTC offset out of range: '{}'", s));
    }

    let (sign, rest) = if let Some(rest) = s.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (-1, rest)
    } else {
        return Err(format!("UTC offset must start with + or -: '{}'", s));
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("UTC offset must look like +HH:MM: '{}'", s));
    }

    let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid hours in '{}'", s))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid minutes in '{}'", s))?;
    if minutes >= 60 {
        return Err(format!("UTC offset minutes must be below 60: '{}'", s));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| format!("UTC offset out of range: '{}'", s))
}

/// Check that a strftime pattern only uses specifiers chrono understands.
pub fn validate_date_format(format: &str) -> Result<(), String> {
    if format.trim().is_empty() {
        return Err("date format cannot be empty".to_string());
    }
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid strftime pattern '{}'", format));
    }
    Ok(())
}
