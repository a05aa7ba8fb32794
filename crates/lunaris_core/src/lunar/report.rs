//! Next-full-moon math and the daily moon snapshot.

use super::cycle::{cycle_position, LUNAR_CYCLE};
use super::phase::{illumination_of, phase_of, MoonPhase};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Moon state shown for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonReport {
    pub day: NaiveDate,
    pub phase: MoonPhase,
    /// Lit fraction in `[0, 1]`.
    pub illumination: f64,
    pub next_full_moon: NaiveDate,
    /// Whole days from `day` to `next_full_moon`; `0` means tonight.
    pub days_until_full_moon: i64,
}

/// Returns the first full-moon day on or after `day`.
///
/// Day-granular: the fractional distance to position `0.5` is rounded to
/// whole days, so the result lands inside the full-moon band.
pub fn next_full_moon_after(day: NaiveDate) -> NaiveDate {
    let days = days_until_full_moon(day);
    day.checked_add_days(Days::new(days.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days until the next full moon, never negative.
pub fn days_until_full_moon(day: NaiveDate) -> i64 {
    let position = cycle_position(day);
    let remaining_cycles = if position < 0.5 {
        0.5 - position
    } else {
        1.5 - position
    };
    (remaining_cycles * LUNAR_CYCLE.length_days).round() as i64
}

/// Builds the moon snapshot for `day`.
pub fn moon_report(day: NaiveDate) -> MoonReport {
    let next_full_moon = next_full_moon_after(day);
    MoonReport {
        day,
        phase: phase_of(day),
        illumination: illumination_of(day),
        next_full_moon,
        days_until_full_moon: (next_full_moon - day).num_days(),
    }
}

/// Header text for the full-moon countdown.
pub fn full_moon_countdown_label(days_until: i64) -> String {
    match days_until {
        0 => "Full Moon tonight!".to_string(),
        1 => "Next full moon in 1 day".to_string(),
        n => format!("Next full moon in {n} days"),
    }
}
