//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Flatten core types into plain string/number envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD` strings.
//! - Failures are reported in-envelope (`ok=false` + `message`), never thrown.

use chrono::{Local, NaiveDate};
use log::warn;
use lunaris_core::db::open_db;
use lunaris_core::{
    annotate_month, core_version as core_version_inner, daily_message, format_calendar_day,
    full_moon_countdown_label, init_logging as init_logging_inner, moon_report,
    parse_calendar_day, parse_calendar_month, ping as ping_inner, DayAnnotation, JournalService,
    JournalServiceError, MonthView, Note, SaveOutcome, SpecialDate, SqliteNoteRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const JOURNAL_DB_FILE_NAME: &str = "lunaris_journal.sqlite3";
static JOURNAL_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Special date supplied by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialDateInput {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Free-form category, e.g. `birthday`.
    pub kind: String,
    pub message: String,
}

/// Moon widget payload for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonTodayResponse {
    pub ok: bool,
    pub message: String,
    pub day: String,
    /// Snake-case phase key, e.g. `waxing_gibbous`.
    pub phase: String,
    /// Display name, e.g. `Waxing Gibbous`.
    pub phase_label: String,
    pub symbol: String,
    /// Lit fraction in `[0, 1]`.
    pub illumination: f64,
    pub next_full_moon: String,
    pub days_until_full_moon: i64,
    /// `Full Moon tonight!` or `Next full moon in N day(s)`.
    pub countdown_label: String,
    /// Full/new moon banner text, when one applies.
    pub daily_message: Option<String>,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDayItem {
    pub date: String,
    pub phase: String,
    pub symbol: String,
    pub illumination: f64,
    pub is_full_moon: bool,
    pub has_note: bool,
    pub is_special_date: bool,
    pub note_id: Option<String>,
    pub note_preview: Option<String>,
    pub special_kind: Option<String>,
    pub special_message: Option<String>,
    pub in_current_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Month grid envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    pub message: String,
    /// First day of the shown month.
    pub month_start: String,
    /// Sunday-first, row-major, length is a multiple of 7.
    pub days: Vec<CalendarDayItem>,
    /// True when no in-month day carries a note or special date.
    pub is_quiet: bool,
    /// Message of the day for `today`.
    pub daily_message: Option<String>,
}

impl CalendarMonthResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            month_start: String::new(),
            days: Vec::new(),
            is_quiet: true,
            daily_message: None,
        }
    }
}

/// Stored note as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub note_id: String,
    pub date: String,
    pub text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Generic action response envelope for journal writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected note ID.
    pub note_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Lookup envelope for a single day's note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLookupResponse {
    pub ok: bool,
    /// `None` when the day has no note.
    pub note: Option<NoteItem>,
    pub message: String,
}

/// Moon report for `day_iso`, or for the local current day when `None`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics; malformed dates yield `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn moon_today(day_iso: Option<String>) -> MoonTodayResponse {
    let day = match resolve_day(day_iso.as_deref()) {
        Ok(day) => day,
        Err(message) => {
            return MoonTodayResponse {
                ok: false,
                message: format!("moon_today failed: {message}"),
                day: String::new(),
                phase: String::new(),
                phase_label: String::new(),
                symbol: String::new(),
                illumination: 0.0,
                next_full_moon: String::new(),
                days_until_full_moon: 0,
                countdown_label: String::new(),
                daily_message: None,
            };
        }
    };

    let report = moon_report(day);
    MoonTodayResponse {
        ok: true,
        message: String::new(),
        day: format_calendar_day(report.day),
        phase: phase_key(report.phase),
        phase_label: report.phase.label().to_string(),
        symbol: report.phase.symbol().to_string(),
        illumination: report.illumination,
        next_full_moon: format_calendar_day(report.next_full_moon),
        days_until_full_moon: report.days_until_full_moon,
        countdown_label: full_moon_countdown_label(report.days_until_full_moon),
        daily_message: daily_message(day, &[]).map(|message| message.text),
    }
}

/// Annotated month grid for one owner.
///
/// Input semantics:
/// - `month_iso`: `YYYY-MM` or any `YYYY-MM-DD` inside the month.
/// - `today_iso`: defaults to the local current day.
/// - `selected_iso`: optional highlighted day.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(
    owner_id: String,
    month_iso: String,
    today_iso: Option<String>,
    selected_iso: Option<String>,
    special_dates: Vec<SpecialDateInput>,
) -> CalendarMonthResponse {
    let view = match build_month_view(&month_iso, today_iso.as_deref(), selected_iso.as_deref()) {
        Ok(view) => view,
        Err(message) => {
            return CalendarMonthResponse::failure(format!("calendar_month failed: {message}"))
        }
    };
    let special_dates = match to_special_dates(special_dates) {
        Ok(special_dates) => special_dates,
        Err(message) => {
            return CalendarMonthResponse::failure(format!("calendar_month failed: {message}"))
        }
    };

    let grid = if owner_id.trim().is_empty() {
        Ok(annotate_month(&view, &[], &special_dates))
    } else {
        with_journal_service(|service| service.month_view(&owner_id, &view, &special_dates))
    };

    match grid {
        Ok(grid) => CalendarMonthResponse {
            ok: true,
            message: String::new(),
            month_start: format_calendar_day(view.month_start()),
            is_quiet: grid.is_quiet(),
            daily_message: daily_message(view.today(), &special_dates).map(|m| m.text),
            days: grid.days().iter().map(to_calendar_day_item).collect(),
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=calendar_month");
            CalendarMonthResponse::failure(format!("calendar_month failed: {err}"))
        }
    }
}

/// Saves the owner's reflection for one day (create or replace).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the stored note ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_save_note(owner_id: String, day_iso: String, text: String) -> NoteActionResponse {
    let day = match parse_calendar_day(&day_iso) {
        Ok(day) => day,
        Err(err) => return NoteActionResponse::failure(format!("journal_save_note failed: {err}")),
    };

    match with_journal_service(|service| service.save_note(&owner_id, day, text)) {
        Ok((note, SaveOutcome::Created)) => {
            NoteActionResponse::success("Note saved.", note.id.to_string())
        }
        Ok((note, SaveOutcome::Updated)) => {
            NoteActionResponse::success("Note updated.", note.id.to_string())
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=journal_save_note");
            NoteActionResponse::failure(format!("journal_save_note failed: {err}"))
        }
    }
}

/// Loads the owner's note for one day.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a day without a note is `ok=true, note=None`.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_get_note(owner_id: String, day_iso: String) -> NoteLookupResponse {
    let lookup = parse_calendar_day(&day_iso)
        .map_err(|err| err.to_string())
        .and_then(|day| {
            with_journal_service(|service| service.get_note_for_date(&owner_id, day))
        });

    match lookup {
        Ok(note) => NoteLookupResponse {
            ok: true,
            message: if note.is_some() {
                "Note found.".to_string()
            } else {
                "No note for this day.".to_string()
            },
            note: note.map(to_note_item),
        },
        Err(err) => NoteLookupResponse {
            ok: false,
            note: None,
            message: format!("journal_get_note failed: {err}"),
        },
    }
}

/// Deletes a note by ID.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_delete_note(note_id: String) -> NoteActionResponse {
    let id = match Uuid::parse_str(note_id.trim()) {
        Ok(id) => id,
        Err(_) => {
            return NoteActionResponse::failure(format!(
                "journal_delete_note failed: invalid note id `{note_id}`"
            ))
        }
    };

    match with_journal_service(|service| service.delete_note(id)) {
        Ok(()) => NoteActionResponse::success("Note deleted.", id.to_string()),
        Err(err) => NoteActionResponse::failure(format!("journal_delete_note failed: {err}")),
    }
}

fn resolve_day(day_iso: Option<&str>) -> Result<NaiveDate, String> {
    match day_iso.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_calendar_day(value).map_err(|err| err.to_string()),
        None => Ok(Local::now().date_naive()),
    }
}

fn build_month_view(
    month_iso: &str,
    today_iso: Option<&str>,
    selected_iso: Option<&str>,
) -> Result<MonthView, String> {
    let month_start = parse_calendar_month(month_iso.trim()).map_err(|err| err.to_string())?;
    let today = resolve_day(today_iso)?;
    let view = MonthView::new(month_start, today);
    match selected_iso.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => {
            let selected = parse_calendar_day(value).map_err(|err| err.to_string())?;
            Ok(view.with_selected(selected))
        }
        None => Ok(view),
    }
}

fn to_special_dates(inputs: Vec<SpecialDateInput>) -> Result<Vec<SpecialDate>, String> {
    inputs
        .into_iter()
        .map(|input| {
            SpecialDate::parse(input.date.trim(), input.kind, input.message)
                .map_err(|err| err.to_string())
        })
        .collect()
}

fn resolve_journal_db_path() -> PathBuf {
    JOURNAL_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LUNARIS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(JOURNAL_DB_FILE_NAME)
        })
        .clone()
}

fn with_journal_service<T>(
    f: impl FnOnce(&JournalService<SqliteNoteRepository<'_>>) -> Result<T, JournalServiceError>,
) -> Result<T, String> {
    let db_path = resolve_journal_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("journal DB open failed: {err}"))?;
    let repo = SqliteNoteRepository::try_new(&conn)
        .map_err(|err| format!("journal repo init failed: {err}"))?;
    let service = JournalService::new(repo);
    f(&service).map_err(|err| err.to_string())
}

fn phase_key(phase: lunaris_core::MoonPhase) -> String {
    use lunaris_core::MoonPhase;
    match phase {
        MoonPhase::NewMoon => "new_moon",
        MoonPhase::WaxingCrescent => "waxing_crescent",
        MoonPhase::FirstQuarter => "first_quarter",
        MoonPhase::WaxingGibbous => "waxing_gibbous",
        MoonPhase::FullMoon => "full_moon",
        MoonPhase::WaningGibbous => "waning_gibbous",
        MoonPhase::LastQuarter => "last_quarter",
        MoonPhase::WaningCrescent => "waning_crescent",
    }
    .to_string()
}

fn to_calendar_day_item(day: &DayAnnotation) -> CalendarDayItem {
    CalendarDayItem {
        date: format_calendar_day(day.date),
        phase: phase_key(day.phase),
        symbol: day.phase.symbol().to_string(),
        illumination: day.illumination,
        is_full_moon: day.is_full_moon,
        has_note: day.has_note,
        is_special_date: day.is_special_date,
        note_id: day.note.as_ref().map(|note| note.id.to_string()),
        note_preview: day.note.as_ref().map(|note| note.preview.clone()),
        special_kind: day.special.as_ref().map(|special| special.kind.clone()),
        special_message: day.special.as_ref().map(|special| special.message.clone()),
        in_current_month: day.in_current_month,
        is_today: day.is_today,
        is_selected: day.is_selected,
    }
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        note_id: note.id.to_string(),
        date: format_calendar_day(note.date),
        text: note.text,
        created_at: note.created_at,
        updated_at: note.updated_at,
    }
}
