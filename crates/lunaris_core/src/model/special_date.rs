//! Caller-supplied special dates (birthdays, anniversaries, ...).

use super::day::{parse_calendar_day, DateParseError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A marked calendar day with a display message.
///
/// Static input; never persisted by core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialDate {
    pub date: NaiveDate,
    /// Free-form category tag, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl SpecialDate {
    pub fn new(date: NaiveDate, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            date,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Builds a special date from an ISO day string.
    pub fn parse(
        date: &str,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, DateParseError> {
        Ok(Self::new(parse_calendar_day(date)?, kind, message))
    }
}
