//! ISO-8601 calendar-day parsing and formatting.

use chrono::{DateTime, Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Input could not be read as a calendar day or month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub input: String,
    pub expected: &'static str,
}

impl Display for DateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date `{}`; expected {}", self.input, self.expected)
    }
}

impl Error for DateParseError {}

/// Parses `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to the calendar day
/// written in its own offset.
pub fn parse_calendar_day(value: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|instant| instant.date_naive())
        .map_err(|_| DateParseError {
            input: value.to_string(),
            expected: "YYYY-MM-DD or an RFC 3339 timestamp",
        })
}

/// Parses `YYYY-MM` (or any full calendar day) into the first day of that month.
pub fn parse_calendar_month(value: &str) -> Result<NaiveDate, DateParseError> {
    let trimmed = value.trim();
    let candidate = if trimmed.len() == 7 {
        format!("{trimmed}-01")
    } else {
        trimmed.to_string()
    };
    let day = parse_calendar_day(&candidate).map_err(|_| DateParseError {
        input: value.to_string(),
        expected: "YYYY-MM",
    })?;
    Ok(day.with_day0(0).unwrap_or(day))
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn format_calendar_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_calendar_day, parse_calendar_day, parse_calendar_month};
    use chrono::NaiveDate;

    #[test]
    fn parses_plain_iso_day() {
        let day = parse_calendar_day(" 2025-04-15 ").expect("valid day");
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 4, 15).expect("date"));
        assert_eq!(format_calendar_day(day), "2025-04-15");
    }

    #[test]
    fn timestamp_keeps_its_written_calendar_day() {
        let day = parse_calendar_day("2025-04-15T23:30:00-05:00").expect("valid timestamp");
        assert_eq!(day, NaiveDate::from_ymd_opt(2025, 4, 15).expect("date"));
    }

    #[test]
    fn rejects_garbage_and_impossible_days() {
        assert!(parse_calendar_day("yesterday").is_err());
        let err = parse_calendar_day("2025-02-30").expect_err("no Feb 30");
        assert!(err.to_string().contains("2025-02-30"));
    }

    #[test]
    fn month_parse_returns_first_day() {
        let first = NaiveDate::from_ymd_opt(2025, 4, 1).expect("date");
        assert_eq!(parse_calendar_month("2025-04").expect("month"), first);
        assert_eq!(parse_calendar_month("2025-04-22").expect("day"), first);
        assert!(parse_calendar_month("2025-13").is_err());
    }
}
