//! Journal use-case service.
//!
//! # Responsibility
//! - Save one reflection per owner per day (create or replace).
//! - Provide get/update/delete/list note APIs.
//! - Feed stored notes into the month calendar projection.
//!
//! # Invariants
//! - Note text is trimmed before persistence; blank text is rejected.
//! - `save_note` never creates a second note for the same owner and day.
//! - Log events carry metadata only, never note text.

use crate::calendar::{annotate_month, MonthGrid, MonthView};
use crate::model::note::{now_epoch_ms, Note, NoteId, NoteValidationError};
use crate::model::special_date::SpecialDate;
use crate::repo::note_repo::{NoteRepository, RepoError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// Input failed note validation (blank owner, blank text, ...).
    InvalidNote(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not match.
    InconsistentState(&'static str),
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNote(err) => write!(f, "invalid note: {err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent journal state: {details}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for JournalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::InvalidNote(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for JournalServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::InvalidNote(value)
    }
}

/// Whether `save_note` inserted a new row or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Journal service facade over repository implementations.
pub struct JournalService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> JournalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the owner's reflection for `date`.
    ///
    /// Replaces the text of an existing note for that day, otherwise creates
    /// one. Returns the stored note as read back from the repository.
    pub fn save_note(
        &self,
        owner_id: &str,
        date: NaiveDate,
        text: impl Into<String>,
    ) -> Result<(Note, SaveOutcome), JournalServiceError> {
        let owner_id = owner_id.trim();
        if owner_id.is_empty() {
            return Err(NoteValidationError::EmptyOwner.into());
        }
        let text = normalize_text(text.into())?;

        let (id, outcome) = match self.repo.get_note_for_date(owner_id, date)? {
            Some(existing) => {
                self.repo
                    .update_note_text(existing.id, &text, now_epoch_ms())?;
                (existing.id, SaveOutcome::Updated)
            }
            None => {
                let note = Note::new(owner_id, date, text);
                (self.repo.create_note(&note)?, SaveOutcome::Created)
            }
        };

        let stored = self
            .repo
            .get_note(id)?
            .ok_or(JournalServiceError::InconsistentState(
                "saved note not found in read-back",
            ))?;
        info!(
            "event=note_save module=service status=ok outcome={} date={}",
            outcome_label(outcome),
            stored.date
        );
        Ok((stored, outcome))
    }

    /// Replaces the text of a note by id.
    pub fn update_note(
        &self,
        id: NoteId,
        text: impl Into<String>,
    ) -> Result<Note, JournalServiceError> {
        let text = normalize_text(text.into())?;
        self.repo.update_note_text(id, &text, now_epoch_ms())?;
        self.repo
            .get_note(id)?
            .ok_or(JournalServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>, JournalServiceError> {
        Ok(self.repo.get_note(id)?)
    }

    /// Gets the owner's note for one day, if any.
    pub fn get_note_for_date(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> Result<Option<Note>, JournalServiceError> {
        Ok(self.repo.get_note_for_date(owner_id.trim(), date)?)
    }

    /// Deletes a note permanently.
    pub fn delete_note(&self, id: NoteId) -> Result<(), JournalServiceError> {
        match self.repo.delete_note(id) {
            Ok(()) => {
                info!("event=note_delete module=service status=ok");
                Ok(())
            }
            Err(err) => {
                warn!("event=note_delete module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Lists all of the owner's notes, newest first.
    pub fn list_notes(&self, owner_id: &str) -> Result<Vec<Note>, JournalServiceError> {
        Ok(self.repo.list_notes(owner_id.trim())?)
    }

    /// Annotated month grid for the owner.
    ///
    /// Only notes inside the visible range are loaded.
    pub fn month_view(
        &self,
        owner_id: &str,
        view: &MonthView,
        special_dates: &[SpecialDate],
    ) -> Result<MonthGrid, JournalServiceError> {
        let range = view.visible_range();
        let notes = self
            .repo
            .list_notes_between(owner_id.trim(), range.start, range.end)?;
        Ok(annotate_month(view, &notes, special_dates))
    }
}

fn normalize_text(text: String) -> Result<String, JournalServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::EmptyText.into());
    }
    Ok(trimmed.to_string())
}

fn outcome_label(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Created => "created",
        SaveOutcome::Updated => "updated",
    }
}
