//! Per-day annotations for a month grid.

use super::view::{MonthView, VisibleRange, DAYS_PER_WEEK};
use crate::lunar::{cycle_position, illumination_for_position, MoonPhase};
use crate::model::note::{Note, NoteId};
use crate::model::special_date::SpecialDate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Note content attached to a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSnippet {
    pub id: NoteId,
    pub text: String,
    /// Whitespace-collapsed, length-capped `text`.
    pub preview: String,
}

/// Special-date content attached to a calendar cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialMark {
    pub kind: String,
    pub message: String,
}

/// Everything the calendar needs to render and select one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAnnotation {
    pub date: NaiveDate,
    pub phase: MoonPhase,
    pub illumination: f64,
    pub is_full_moon: bool,
    pub has_note: bool,
    pub is_special_date: bool,
    pub note: Option<NoteSnippet>,
    pub special: Option<SpecialMark>,
    /// `false` for leading/trailing days borrowed from adjacent months.
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Annotated visible range for one month view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    view: MonthView,
    range: VisibleRange,
    days: Vec<DayAnnotation>,
}

impl MonthGrid {
    pub fn view(&self) -> &MonthView {
        &self.view
    }

    pub fn range(&self) -> VisibleRange {
        self.range
    }

    /// All visible days, chronological.
    pub fn days(&self) -> &[DayAnnotation] {
        &self.days
    }

    /// Sunday-first week rows.
    pub fn rows(&self) -> impl Iterator<Item = &[DayAnnotation]> {
        self.days.chunks(DAYS_PER_WEEK)
    }

    /// Looks up one visible day.
    pub fn day(&self, date: NaiveDate) -> Option<&DayAnnotation> {
        if !self.range.contains(date) {
            return None;
        }
        let offset = usize::try_from((date - self.range.start).num_days()).ok()?;
        self.days.get(offset)
    }

    /// In-month days falling in the full-moon band.
    pub fn full_moons(&self) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|day| day.in_current_month && day.is_full_moon)
            .map(|day| day.date)
            .collect()
    }

    /// True when no in-month day carries a note or a special date.
    pub fn is_quiet(&self) -> bool {
        self.days
            .iter()
            .filter(|day| day.in_current_month)
            .all(|day| !day.has_note && !day.is_special_date)
    }

    pub fn into_days(self) -> Vec<DayAnnotation> {
        self.days
    }
}

/// Annotates every visible day of `view`.
///
/// `notes` and `special_dates` may be unordered and may contain entries
/// outside the visible range; those are ignored.
pub fn annotate_month(
    view: &MonthView,
    notes: &[Note],
    special_dates: &[SpecialDate],
) -> MonthGrid {
    let range = view.visible_range();
    let notes_by_day = index_notes(notes, range);
    let specials_by_day = index_special_dates(special_dates, range);

    let days = range
        .days()
        .map(|date| {
            build_annotation(
                date,
                view,
                notes_by_day.get(&date).copied(),
                specials_by_day.get(&date).copied(),
            )
        })
        .collect();

    MonthGrid {
        view: *view,
        range,
        days,
    }
}

/// Annotates a single day, e.g. for a selection callback.
pub fn annotate_day(
    date: NaiveDate,
    view: &MonthView,
    notes: &[Note],
    special_dates: &[SpecialDate],
) -> DayAnnotation {
    build_annotation(
        date,
        view,
        find_note_for_day(notes, date),
        find_special_date(special_dates, date),
    )
}

/// Note for `date`; the most recently updated wins, earlier list position on ties.
pub fn find_note_for_day(notes: &[Note], date: NaiveDate) -> Option<&Note> {
    notes
        .iter()
        .filter(|note| note.date == date)
        .fold(None, |best, note| pick_newer(best, note))
}

/// First special date matching `date`, in caller order.
pub fn find_special_date(special_dates: &[SpecialDate], date: NaiveDate) -> Option<&SpecialDate> {
    special_dates.iter().find(|special| special.date == date)
}

fn index_notes(notes: &[Note], range: VisibleRange) -> BTreeMap<NaiveDate, &Note> {
    let mut by_day: BTreeMap<NaiveDate, &Note> = BTreeMap::new();
    for note in notes.iter().filter(|note| range.contains(note.date)) {
        let current = by_day.get(&note.date).copied();
        if let Some(winner) = pick_newer(current, note) {
            by_day.insert(note.date, winner);
        }
    }
    by_day
}

fn index_special_dates(
    special_dates: &[SpecialDate],
    range: VisibleRange,
) -> BTreeMap<NaiveDate, &SpecialDate> {
    let mut by_day = BTreeMap::new();
    for special in special_dates
        .iter()
        .filter(|special| range.contains(special.date))
    {
        by_day.entry(special.date).or_insert(special);
    }
    by_day
}

fn pick_newer<'a>(current: Option<&'a Note>, candidate: &'a Note) -> Option<&'a Note> {
    match current {
        Some(existing) if existing.updated_at >= candidate.updated_at => Some(existing),
        _ => Some(candidate),
    }
}

fn build_annotation(
    date: NaiveDate,
    view: &MonthView,
    note: Option<&Note>,
    special: Option<&SpecialDate>,
) -> DayAnnotation {
    let position = cycle_position(date);
    let phase = MoonPhase::from_position(position);
    DayAnnotation {
        date,
        phase,
        illumination: illumination_for_position(position),
        is_full_moon: phase == MoonPhase::FullMoon,
        has_note: note.is_some(),
        is_special_date: special.is_some(),
        note: note.map(|note| NoteSnippet {
            id: note.id,
            text: note.text.clone(),
            preview: note.preview(),
        }),
        special: special.map(|special| SpecialMark {
            kind: special.kind.clone(),
            message: special.message.clone(),
        }),
        in_current_month: view.contains(date),
        is_today: date == view.today(),
        is_selected: view.selected() == Some(date),
    }
}
