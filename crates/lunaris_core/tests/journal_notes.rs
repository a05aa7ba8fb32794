use chrono::NaiveDate;
use lunaris_core::db::open_db_in_memory;
use lunaris_core::{
    JournalService, JournalServiceError, MonthView, Note, NoteRepository, NoteValidationError,
    RepoError, SaveOutcome, SpecialDate, SqliteNoteRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn service(conn: &Connection) -> JournalService<SqliteNoteRepository<'_>> {
    JournalService::new(SqliteNoteRepository::try_new(conn).unwrap())
}

#[test]
fn save_creates_then_replaces_the_same_day_note() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);

    let (first, outcome) = journal
        .save_note("owner-1", day(2025, 4, 15), "  first draft  ")
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Created);
    assert_eq!(first.text, "first draft");
    assert_eq!(first.date, day(2025, 4, 15));

    let (second, outcome) = journal
        .save_note("owner-1", day(2025, 4, 15), "rewritten")
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Updated);
    assert_eq!(second.id, first.id);
    assert_eq!(second.text, "rewritten");
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= second.created_at);

    assert_eq!(journal.list_notes("owner-1").unwrap().len(), 1);
}

#[test]
fn notes_are_scoped_per_owner() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);

    journal
        .save_note("owner-1", day(2025, 4, 15), "mine")
        .unwrap();
    let (other, outcome) = journal
        .save_note("owner-2", day(2025, 4, 15), "theirs")
        .unwrap();
    assert_eq!(outcome, SaveOutcome::Created);

    let mine = journal
        .get_note_for_date("owner-1", day(2025, 4, 15))
        .unwrap()
        .unwrap();
    assert_eq!(mine.text, "mine");
    assert_ne!(mine.id, other.id);
    assert!(journal
        .get_note_for_date("owner-3", day(2025, 4, 15))
        .unwrap()
        .is_none());
}

#[test]
fn blank_text_and_blank_owner_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);

    let err = journal
        .save_note("owner-1", day(2025, 4, 15), " \n\t ")
        .unwrap_err();
    assert!(matches!(
        err,
        JournalServiceError::InvalidNote(NoteValidationError::EmptyText)
    ));

    let err = journal
        .save_note("   ", day(2025, 4, 15), "text")
        .unwrap_err();
    assert!(matches!(
        err,
        JournalServiceError::InvalidNote(NoteValidationError::EmptyOwner)
    ));

    assert!(journal.list_notes("owner-1").unwrap().is_empty());
}

#[test]
fn repository_refuses_second_note_for_same_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    repo.create_note(&Note::new("owner-1", day(2025, 4, 15), "one"))
        .unwrap();
    let err = repo
        .create_note(&Note::new("owner-1", day(2025, 4, 15), "two"))
        .unwrap_err();
    match err {
        RepoError::Conflict { owner_id, date } => {
            assert_eq!(owner_id, "owner-1");
            assert_eq!(date, day(2025, 4, 15));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_validates_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut note = Note::new("owner-1", day(2025, 4, 15), "text");
    note.updated_at = note.created_at - 1;
    let err = repo.create_note(&note).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(NoteValidationError::InvalidTimestamps { .. })
    ));
}

#[test]
fn list_notes_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let dates = [day(2025, 4, 1), day(2025, 4, 2), day(2025, 4, 3)];
    for (offset, date) in dates.iter().enumerate() {
        let created_at = 1_000 + offset as i64;
        let note = Note::with_id(Uuid::new_v4(), "owner-1", *date, "entry", created_at).unwrap();
        repo.create_note(&note).unwrap();
    }

    let listed: Vec<_> = repo
        .list_notes("owner-1")
        .unwrap()
        .into_iter()
        .map(|note| note.date)
        .collect();
    assert_eq!(listed, vec![dates[2], dates[1], dates[0]]);
}

#[test]
fn list_notes_between_is_inclusive_and_day_ordered() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);
    for date in [day(2025, 5, 3), day(2025, 3, 30), day(2025, 3, 29), day(2025, 4, 15)] {
        journal.save_note("owner-1", date, "entry").unwrap();
    }

    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let listed: Vec<_> = repo
        .list_notes_between("owner-1", day(2025, 3, 30), day(2025, 5, 3))
        .unwrap()
        .into_iter()
        .map(|note| note.date)
        .collect();
    assert_eq!(listed, vec![day(2025, 3, 30), day(2025, 4, 15), day(2025, 5, 3)]);
}

#[test]
fn update_and_delete_by_id() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);

    let (note, _) = journal
        .save_note("owner-1", day(2025, 4, 15), "draft")
        .unwrap();
    let updated = journal.update_note(note.id, "final").unwrap();
    assert_eq!(updated.text, "final");
    assert_eq!(updated.id, note.id);

    journal.delete_note(note.id).unwrap();
    assert!(journal.get_note(note.id).unwrap().is_none());

    let err = journal.delete_note(note.id).unwrap_err();
    assert!(matches!(err, JournalServiceError::NoteNotFound(id) if id == note.id));

    let err = journal.update_note(note.id, "again").unwrap_err();
    assert!(matches!(err, JournalServiceError::NoteNotFound(_)));
}

#[test]
fn month_view_marks_saved_notes_and_special_dates() {
    let conn = open_db_in_memory().unwrap();
    let journal = service(&conn);
    journal
        .save_note("owner-1", day(2025, 4, 15), "x")
        .unwrap();
    journal
        .save_note("owner-2", day(2025, 4, 16), "not mine")
        .unwrap();

    let view = MonthView::new(day(2025, 4, 1), day(2025, 4, 15));
    let specials = vec![SpecialDate::parse("2025-04-15", "birthday", "Birthday").unwrap()];
    let grid = journal.month_view("owner-1", &view, &specials).unwrap();

    assert_eq!(grid.days().len(), 35);
    let flagged: Vec<_> = grid
        .days()
        .iter()
        .filter(|d| d.has_note || d.is_special_date)
        .map(|d| d.date)
        .collect();
    assert_eq!(flagged, vec![day(2025, 4, 15)]);

    let fifteenth = grid.day(day(2025, 4, 15)).unwrap();
    assert!(fifteenth.has_note && fifteenth.is_special_date && fifteenth.is_today);
    assert_eq!(fifteenth.note.as_ref().unwrap().text, "x");
}
