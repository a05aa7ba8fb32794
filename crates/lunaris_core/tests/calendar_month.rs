use chrono::{Datelike, NaiveDate, Weekday};
use lunaris_core::calendar::find_note_for_day;
use lunaris_core::{
    annotate_day, annotate_month, daily_message, phase_of, DailyMessageKind, MonthView, MoonPhase,
    Note, SpecialDate,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn note_on(date: &str, text: &str, updated_at: i64) -> Note {
    let mut note = Note::new("owner-1", day_from(date), text);
    note.created_at = updated_at;
    note.updated_at = updated_at;
    note
}

fn day_from(value: &str) -> NaiveDate {
    lunaris_core::parse_calendar_day(value).unwrap()
}

fn april_2025() -> MonthView {
    MonthView::new(day(2025, 4, 9), day(2025, 4, 20))
}

#[test]
fn april_2025_grid_spans_five_sunday_first_weeks() {
    let grid = annotate_month(&april_2025(), &[], &[]);
    let range = grid.range();

    assert_eq!(range.start, day(2025, 3, 30));
    assert_eq!(range.end, day(2025, 5, 3));
    assert_eq!(grid.days().len(), 35);
    assert_eq!(grid.rows().count(), 5);
    for row in grid.rows() {
        assert_eq!(row.len(), 7);
        assert_eq!(row[0].date.weekday(), Weekday::Sun);
    }
    for pair in grid.days().windows(2) {
        assert_eq!(pair[1].date, pair[0].date.succ_opt().unwrap());
    }
}

#[test]
fn note_and_special_date_on_same_day_are_both_flagged() {
    let notes = vec![note_on("2025-04-15", "x", 1)];
    let specials = vec![SpecialDate::parse("2025-04-15", "birthday", "Birthday").unwrap()];
    let grid = annotate_month(&april_2025(), &notes, &specials);

    for annotation in grid.days() {
        let expected = annotation.date == day(2025, 4, 15);
        assert_eq!(annotation.has_note, expected, "{}", annotation.date);
        assert_eq!(annotation.is_special_date, expected, "{}", annotation.date);
    }

    let fifteenth = grid.day(day(2025, 4, 15)).unwrap();
    let note = fifteenth.note.as_ref().unwrap();
    assert_eq!(note.id, notes[0].id);
    assert_eq!(note.text, "x");
    let special = fifteenth.special.as_ref().unwrap();
    assert_eq!(special.message, "Birthday");
    assert_eq!(special.kind, "birthday");
}

#[test]
fn view_markers_follow_month_today_and_selection() {
    let view = april_2025().with_selected(day(2025, 4, 2));
    let grid = annotate_month(&view, &[], &[]);

    let leading = grid.day(day(2025, 3, 31)).unwrap();
    assert!(!leading.in_current_month);
    let trailing = grid.day(day(2025, 5, 3)).unwrap();
    assert!(!trailing.in_current_month);
    assert_eq!(
        grid.days().iter().filter(|d| d.in_current_month).count(),
        30
    );

    let today: Vec<_> = grid.days().iter().filter(|d| d.is_today).collect();
    assert_eq!(today.len(), 1);
    assert_eq!(today[0].date, day(2025, 4, 20));

    let selected: Vec<_> = grid.days().iter().filter(|d| d.is_selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].date, day(2025, 4, 2));
}

#[test]
fn phase_fields_agree_with_moon_engine() {
    let grid = annotate_month(&april_2025(), &[], &[]);
    for annotation in grid.days() {
        assert_eq!(annotation.phase, phase_of(annotation.date));
        assert_eq!(annotation.is_full_moon, annotation.phase == MoonPhase::FullMoon);
        assert!((0.0..=1.0).contains(&annotation.illumination));
    }
    assert_eq!(grid.full_moons(), vec![day(2025, 4, 11), day(2025, 4, 12)]);
}

#[test]
fn notes_on_adjacent_month_days_are_visible_and_out_of_range_ignored() {
    let notes = vec![
        note_on("2025-05-01", "trailing", 1),
        note_on("2025-05-04", "outside", 1),
        note_on("2025-03-29", "outside", 1),
    ];
    let grid = annotate_month(&april_2025(), &notes, &[]);

    let flagged: Vec<_> = grid
        .days()
        .iter()
        .filter(|d| d.has_note)
        .map(|d| d.date)
        .collect();
    assert_eq!(flagged, vec![day(2025, 5, 1)]);
    assert!(grid.is_quiet(), "adjacent-month notes do not count");
}

#[test]
fn duplicate_notes_resolve_to_latest_update() {
    let older = note_on("2025-04-15", "older", 1_000);
    let newer = note_on("2025-04-15", "newer", 2_000);
    let tie = note_on("2025-04-15", "tie", 2_000);
    let notes = vec![older, newer.clone(), tie];

    let grid = annotate_month(&april_2025(), &notes, &[]);
    let picked = grid.day(day(2025, 4, 15)).unwrap().note.as_ref().unwrap();
    assert_eq!(picked.id, newer.id);
    assert_eq!(find_note_for_day(&notes, day(2025, 4, 15)).unwrap().id, newer.id);
}

#[test]
fn duplicate_special_dates_keep_caller_order() {
    let specials = vec![
        SpecialDate::parse("2025-04-15", "birthday", "first").unwrap(),
        SpecialDate::parse("2025-04-15", "anniversary", "second").unwrap(),
    ];
    let grid = annotate_month(&april_2025(), &[], &specials);
    let special = grid.day(day(2025, 4, 15)).unwrap().special.as_ref().unwrap();
    assert_eq!(special.message, "first");
}

#[test]
fn annotate_day_matches_grid_cell() {
    let view = april_2025().with_selected(day(2025, 4, 15));
    let notes = vec![note_on("2025-04-15", "  a\n\nreflection  ", 5)];
    let specials = vec![SpecialDate::parse("2025-04-15", "birthday", "Birthday").unwrap()];

    let grid = annotate_month(&view, &notes, &specials);
    let single = annotate_day(day(2025, 4, 15), &view, &notes, &specials);
    assert_eq!(grid.day(day(2025, 4, 15)), Some(&single));
    assert_eq!(single.note.as_ref().unwrap().preview, "a reflection");
    assert!(single.is_selected);
}

#[test]
fn grid_lookup_outside_range_is_none() {
    let grid = annotate_month(&april_2025(), &[], &[]);
    assert!(grid.day(day(2025, 3, 29)).is_none());
    assert!(grid.day(day(2025, 5, 4)).is_none());
}

#[test]
fn quiet_month_detection() {
    let grid = annotate_month(&april_2025(), &[], &[]);
    assert!(grid.is_quiet());

    let specials = vec![SpecialDate::parse("2025-04-03", "trip", "Lisbon").unwrap()];
    assert!(!annotate_month(&april_2025(), &[], &specials).is_quiet());
}

#[test]
fn daily_message_prefers_moon_events_over_special_dates() {
    let specials = vec![
        SpecialDate::parse("2000-01-20", "birthday", "Birthday").unwrap(),
        SpecialDate::parse("2025-04-15", "birthday", "Tonight, the universe celebrates YOU.")
            .unwrap(),
    ];

    let full = daily_message(day(2000, 1, 20), &specials).unwrap();
    assert_eq!(full.kind, DailyMessageKind::FullMoon);

    let new = daily_message(day(2000, 1, 6), &specials).unwrap();
    assert_eq!(new.kind, DailyMessageKind::NewMoon);

    let special = daily_message(day(2025, 4, 15), &specials).unwrap();
    assert_eq!(special.kind, DailyMessageKind::SpecialDate);
    assert_eq!(special.text, "Tonight, the universe celebrates YOU.");

    assert!(daily_message(day(2025, 4, 16), &specials).is_none());
}

#[test]
fn special_date_parse_rejects_malformed_day() {
    let err = SpecialDate::parse("15/04/2025", "birthday", "x").unwrap_err();
    assert!(err.to_string().contains("15/04/2025"));
}
