//! Journal domain model.
//!
//! # Responsibility
//! - Define the note and special-date records shared by storage, services and
//!   the calendar projection.
//! - Own calendar-day parsing so every layer agrees on one date convention.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Dates are calendar days (`NaiveDate`); no time zone is attached.
//! - At most one note per `(owner_id, date)`; storage enforces it.

pub mod day;
pub mod note;
pub mod special_date;
