//! Message of the day shown above the journal entry.

use super::annotate::find_special_date;
use crate::lunar::{phase_of, MoonPhase};
use crate::model::special_date::SpecialDate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FULL_MOON_MESSAGE: &str = "Full Moon tonight! A time for completion and clarity.";
const NEW_MOON_MESSAGE: &str = "New Moon tonight! Set your intentions for the cycle ahead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyMessageKind {
    FullMoon,
    NewMoon,
    SpecialDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyMessage {
    pub kind: DailyMessageKind,
    pub text: String,
}

/// Picks the banner for `today`.
///
/// Precedence: full moon, then new moon, then the first matching special date.
pub fn daily_message(today: NaiveDate, special_dates: &[SpecialDate]) -> Option<DailyMessage> {
    match phase_of(today) {
        MoonPhase::FullMoon => Some(DailyMessage {
            kind: DailyMessageKind::FullMoon,
            text: FULL_MOON_MESSAGE.to_string(),
        }),
        MoonPhase::NewMoon => Some(DailyMessage {
            kind: DailyMessageKind::NewMoon,
            text: NEW_MOON_MESSAGE.to_string(),
        }),
        _ => find_special_date(special_dates, today).map(|special| DailyMessage {
            kind: DailyMessageKind::SpecialDate,
            text: special.message.clone(),
        }),
    }
}
