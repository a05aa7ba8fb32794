//! Lunar cycle approximation.
//!
//! # Responsibility
//! - Map calendar days and UTC instants to a position in the synodic cycle.
//! - Derive phase names, illumination and the next full moon from that position.
//!
//! # Invariants
//! - Every function here is total over finite dates and never fails.
//! - Cycle position is always in `[0, 1)`, including dates before the epoch.
//! - A calendar day is sampled at its UTC midday instant.
//!
//! # See also
//! - `crate::calendar` for the month projection built on top of this engine.

pub mod cycle;
pub mod phase;
pub mod report;

pub use cycle::{cycle_position, cycle_position_at, midday_instant, CycleReference, LUNAR_CYCLE};
pub use phase::{
    illumination_at, illumination_for_position, illumination_of, phase_at, phase_of, MoonPhase,
};
pub use report::{
    days_until_full_moon, full_moon_countdown_label, moon_report, next_full_moon_after,
    MoonReport,
};
