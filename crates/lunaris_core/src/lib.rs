//! Core domain logic for Lunaris, a moon-phase journal.
//! This crate is the single source of truth for lunar math, the calendar
//! projection and note persistence rules.

pub mod calendar;
pub mod db;
pub mod logging;
pub mod lunar;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{
    annotate_day, annotate_month, daily_message, DailyMessage, DailyMessageKind, DayAnnotation,
    MonthGrid, MonthView, NoteSnippet, SpecialMark, VisibleRange,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use lunar::{
    days_until_full_moon, full_moon_countdown_label, illumination_at, illumination_of,
    moon_report, next_full_moon_after, phase_at, phase_of, CycleReference, MoonPhase, MoonReport,
    LUNAR_CYCLE,
};
pub use model::day::{format_calendar_day, parse_calendar_day, parse_calendar_month, DateParseError};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use model::special_date::SpecialDate;
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use service::journal_service::{JournalService, JournalServiceError, SaveOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
