//! Immutable month view state and visible day range.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

/// What the calendar is currently showing.
///
/// Navigation returns a new value; the annotator is simply re-run with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    month_start: NaiveDate,
    today: NaiveDate,
    selected: Option<NaiveDate>,
}

impl MonthView {
    /// Opens the month containing `any_day`.
    pub fn new(any_day: NaiveDate, today: NaiveDate) -> Self {
        Self {
            month_start: first_of_month(any_day),
            today,
            selected: None,
        }
    }

    /// Returns a copy with `day` marked as selected.
    pub fn with_selected(self, day: NaiveDate) -> Self {
        Self {
            selected: Some(day),
            ..self
        }
    }

    pub fn month_start(&self) -> NaiveDate {
        self.month_start
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected(&self) -> Option<NaiveDate> {
        self.selected
    }

    /// Last day of the displayed month.
    pub fn month_end(&self) -> NaiveDate {
        self.month_start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// Same view moved one month back; `today` and `selected` are kept.
    pub fn previous_month(&self) -> Self {
        Self {
            month_start: self
                .month_start
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.month_start),
            ..*self
        }
    }

    /// Same view moved one month forward; `today` and `selected` are kept.
    pub fn next_month(&self) -> Self {
        Self {
            month_start: self
                .month_start
                .checked_add_months(Months::new(1))
                .unwrap_or(self.month_start),
            ..*self
        }
    }

    /// Whether `day` belongs to the displayed month.
    pub fn contains(&self, day: NaiveDate) -> bool {
        day.year() == self.month_start.year() && day.month() == self.month_start.month()
    }

    /// Whole weeks covering the month, Sunday through Saturday.
    pub fn visible_range(&self) -> VisibleRange {
        let month_end = self.month_end();
        let lead = u64::from(self.month_start.weekday().num_days_from_sunday());
        let trail = 6 - u64::from(month_end.weekday().num_days_from_sunday());
        VisibleRange {
            start: self
                .month_start
                .checked_sub_days(Days::new(lead))
                .unwrap_or(self.month_start),
            end: month_end
                .checked_add_days(Days::new(trail))
                .unwrap_or(month_end),
        }
    }
}

/// Inclusive day range rendered by a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VisibleRange {
    /// Days in chronological order, both ends included.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn len(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn weeks(&self) -> usize {
        self.len() / DAYS_PER_WEEK
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

#[cfg(test)]
mod tests {
    use super::MonthView;
    use chrono::{Datelike, NaiveDate, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn month_end_handles_leap_february() {
        let view = MonthView::new(day(2024, 2, 10), day(2024, 2, 10));
        assert_eq!(view.month_end(), day(2024, 2, 29));
    }

    #[test]
    fn navigation_crosses_year_boundaries() {
        let view = MonthView::new(day(2025, 1, 20), day(2025, 1, 20)).with_selected(day(2025, 1, 3));
        let previous = view.previous_month();
        assert_eq!(previous.month_start(), day(2024, 12, 1));
        assert_eq!(previous.selected(), Some(day(2025, 1, 3)));
        assert_eq!(previous.next_month(), view);
        assert_eq!(view.next_month().month_start(), day(2025, 2, 1));
    }

    #[test]
    fn visible_range_always_spans_whole_weeks() {
        let mut view = MonthView::new(day(2024, 1, 1), day(2024, 1, 1));
        for _ in 0..36 {
            let range = view.visible_range();
            assert_eq!(range.start.weekday(), Weekday::Sun);
            assert_eq!(range.end.weekday(), Weekday::Sat);
            assert_eq!(range.len() % 7, 0);
            assert!((4..=6).contains(&range.weeks()), "{range:?}");
            assert!(range.contains(view.month_start()));
            assert!(range.contains(view.month_end()));
            view = view.next_month();
        }
    }

    #[test]
    fn february_starting_on_sunday_fits_four_weeks() {
        let range = MonthView::new(day(2015, 2, 1), day(2015, 2, 1)).visible_range();
        assert_eq!(range.start, day(2015, 2, 1));
        assert_eq!(range.end, day(2015, 2, 28));
        assert_eq!(range.weeks(), 4);
    }
}
