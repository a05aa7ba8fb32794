//! Month calendar projection.
//!
//! # Responsibility
//! - Derive the visible Sunday-first week grid for a month.
//! - Cross-reference each visible day with the moon engine, saved notes and
//!   special dates.
//! - Pick the message of the day shown above the journal.
//!
//! # Invariants
//! - Projections are pure: inputs are read-only snapshots, nothing is cached.
//! - Output days are strictly chronological, row-major in 7-wide rows.
//! - Matching is calendar-day equality only.

pub mod annotate;
pub mod message;
pub mod view;

pub use annotate::{
    annotate_day, annotate_month, find_note_for_day, find_special_date, DayAnnotation, MonthGrid,
    NoteSnippet, SpecialMark,
};
pub use message::{daily_message, DailyMessage, DailyMessageKind};
pub use view::{MonthView, VisibleRange, DAYS_PER_WEEK};
