//! Cycle reference and position math.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Fixed anchor for all cycle computations.
///
/// `epoch_unix_ms` is a known new-moon instant; `length_days` is the mean
/// synodic month used by the approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReference {
    /// Known new moon, Unix epoch milliseconds (UTC).
    pub epoch_unix_ms: i64,
    /// Cycle length in days.
    pub length_days: f64,
}

/// New moon at 2000-01-06T00:00:00Z, 29.53-day cycle.
pub const LUNAR_CYCLE: CycleReference = CycleReference {
    epoch_unix_ms: 947_116_800_000,
    length_days: 29.53,
};

impl CycleReference {
    /// Fractional days elapsed since the reference new moon.
    ///
    /// Negative for instants before the epoch.
    pub fn days_since_epoch_ms(&self, unix_ms: i64) -> f64 {
        (unix_ms - self.epoch_unix_ms) as f64 / MILLIS_PER_DAY as f64
    }

    /// Cycle position in `[0, 1)` for a Unix-millisecond instant.
    ///
    /// `0` is new moon and `0.5` is full moon.
    pub fn position_at_ms(&self, unix_ms: i64) -> f64 {
        let days = self.days_since_epoch_ms(unix_ms);
        let position = days.rem_euclid(self.length_days) / self.length_days;
        // Tiny negative offsets can round up to exactly one full cycle.
        if position >= 1.0 {
            0.0
        } else {
            position
        }
    }

    /// Cycle length expressed in whole milliseconds.
    pub fn length_ms(&self) -> i64 {
        (self.length_days * MILLIS_PER_DAY as f64).round() as i64
    }
}

/// Returns the instant used to represent a calendar day (12:00 UTC).
pub fn midday_instant(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN).and_utc();
    midnight + chrono::Duration::hours(12)
}

/// Cycle position for a UTC instant against [`LUNAR_CYCLE`].
pub fn cycle_position_at(instant: DateTime<Utc>) -> f64 {
    LUNAR_CYCLE.position_at_ms(instant.timestamp_millis())
}

/// Cycle position for a calendar day against [`LUNAR_CYCLE`].
pub fn cycle_position(day: NaiveDate) -> f64 {
    cycle_position_at(midday_instant(day))
}

#[cfg(test)]
mod tests {
    use super::{cycle_position, midday_instant, LUNAR_CYCLE};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn epoch_constant_matches_reference_new_moon() {
        let epoch = Utc
            .with_ymd_and_hms(2000, 1, 6, 0, 0, 0)
            .single()
            .expect("valid epoch");
        assert_eq!(epoch.timestamp_millis(), LUNAR_CYCLE.epoch_unix_ms);
        assert_eq!(LUNAR_CYCLE.position_at_ms(LUNAR_CYCLE.epoch_unix_ms), 0.0);
    }

    #[test]
    fn midday_instant_is_noon_utc() {
        let instant = midday_instant(day(2025, 4, 15));
        assert_eq!(instant.to_rfc3339(), "2025-04-15T12:00:00+00:00");
    }

    #[test]
    fn position_before_epoch_is_normalized() {
        let one_day_before = LUNAR_CYCLE.epoch_unix_ms - 86_400_000;
        let position = LUNAR_CYCLE.position_at_ms(one_day_before);
        let expected = (LUNAR_CYCLE.length_days - 1.0) / LUNAR_CYCLE.length_days;
        assert!((position - expected).abs() < 1e-12, "position={position}");
    }

    #[test]
    fn position_just_before_epoch_never_reaches_one() {
        let position = LUNAR_CYCLE.position_at_ms(LUNAR_CYCLE.epoch_unix_ms - 1);
        assert!((0.0..1.0).contains(&position), "position={position}");
    }

    #[test]
    fn position_stays_in_unit_interval_far_from_epoch() {
        for sample in [day(1, 1, 1), day(1850, 7, 4), day(1999, 12, 31), day(2400, 2, 29)] {
            let position = cycle_position(sample);
            assert!((0.0..1.0).contains(&position), "{sample}: {position}");
        }
    }

    #[test]
    fn length_ms_rounds_cycle_length() {
        assert_eq!(LUNAR_CYCLE.length_ms(), 2_551_392_000);
    }
}
