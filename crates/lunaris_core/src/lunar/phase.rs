//! Phase naming and illumination.

use super::cycle::{cycle_position, cycle_position_at};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

/// Named stage of the lunar cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

/// Exclusive upper bound of each phase band, in cycle order.
///
/// Positions at or above the last bound wrap back to `NewMoon`.
const PHASE_BANDS: [(f64, MoonPhase); 8] = [
    (0.025, MoonPhase::NewMoon),
    (0.225, MoonPhase::WaxingCrescent),
    (0.275, MoonPhase::FirstQuarter),
    (0.475, MoonPhase::WaxingGibbous),
    (0.525, MoonPhase::FullMoon),
    (0.725, MoonPhase::WaningGibbous),
    (0.775, MoonPhase::LastQuarter),
    (0.975, MoonPhase::WaningCrescent),
];

impl MoonPhase {
    /// All phases in cycle order starting at new moon.
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Maps a cycle position to its phase band.
    ///
    /// Bands are inclusive-low/exclusive-high. Positions outside `[0, 1)`
    /// (including NaN) fall through to `NewMoon`.
    pub fn from_position(position: f64) -> Self {
        PHASE_BANDS
            .iter()
            .find(|(upper, _)| position >= 0.0 && position < *upper)
            .map_or(MoonPhase::NewMoon, |(_, phase)| *phase)
    }

    /// Human-readable name, e.g. `"Waxing Gibbous"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::WaningGibbous => "Waning Gibbous",
            Self::LastQuarter => "Last Quarter",
            Self::WaningCrescent => "Waning Crescent",
        }
    }

    /// Moon glyph used by compact renderings.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::NewMoon => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌕",
            Self::WaningGibbous => "🌖",
            Self::LastQuarter => "🌗",
            Self::WaningCrescent => "🌘",
        }
    }

    /// Whether the lit fraction is growing toward full moon.
    pub fn is_waxing(self) -> bool {
        matches!(
            self,
            Self::WaxingCrescent | Self::FirstQuarter | Self::WaxingGibbous
        )
    }
}

impl Display for MoonPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Phase for a calendar day.
pub fn phase_of(day: NaiveDate) -> MoonPhase {
    MoonPhase::from_position(cycle_position(day))
}

/// Phase for a UTC instant.
pub fn phase_at(instant: DateTime<Utc>) -> MoonPhase {
    MoonPhase::from_position(cycle_position_at(instant))
}

/// Approximate lit fraction of the disk for a calendar day, in `[0, 1]`.
pub fn illumination_of(day: NaiveDate) -> f64 {
    illumination_for_position(cycle_position(day))
}

/// Approximate lit fraction of the disk for a UTC instant, in `[0, 1]`.
pub fn illumination_at(instant: DateTime<Utc>) -> f64 {
    illumination_for_position(cycle_position_at(instant))
}

/// Lit fraction for a cycle position: `|sin(π·position)|`.
pub fn illumination_for_position(position: f64) -> f64 {
    (position * PI).sin().abs().min(1.0)
}
