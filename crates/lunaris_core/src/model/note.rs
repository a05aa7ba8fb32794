//! Daily reflection note.
//!
//! # Responsibility
//! - Define the canonical note record written once per owner per day.
//! - Validate identity, ownership and timestamp ordering before persistence.
//!
//! # Invariants
//! - `id` is stable and never nil.
//! - `owner_id` and `text` are never blank.
//! - `updated_at >= created_at`.

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned on creation.
pub type NoteId = Uuid;

const NOTE_PREVIEW_MAX_CHARS: usize = 100;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Validation failure for a note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NilId,
    EmptyOwner,
    EmptyText,
    InvalidTimestamps { created_at: i64, updated_at: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::EmptyOwner => write!(f, "note owner_id must not be blank"),
            Self::EmptyText => write!(f, "note text must not be blank"),
            Self::InvalidTimestamps {
                created_at,
                updated_at,
            } => write!(
                f,
                "updated_at ({updated_at}) must be >= created_at ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// One reflection note for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteWire")]
pub struct Note {
    pub id: NoteId,
    pub owner_id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub text: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Bumped on every text replacement.
    pub updated_at: i64,
}

#[derive(Deserialize)]
struct NoteWire {
    id: NoteId,
    owner_id: String,
    date: NaiveDate,
    text: String,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<NoteWire> for Note {
    type Error = NoteValidationError;

    fn try_from(wire: NoteWire) -> Result<Self, Self::Error> {
        let note = Note {
            id: wire.id,
            owner_id: wire.owner_id,
            date: wire.date,
            text: wire.text,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
        };
        note.validate()?;
        Ok(note)
    }
}

impl Note {
    /// Creates a note with a generated id, stamped with the current time.
    ///
    /// Does not validate; repositories validate on write.
    pub fn new(owner_id: impl Into<String>, date: NaiveDate, text: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            date,
            text: text.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a note with caller-provided identity and creation time.
    ///
    /// Used by import paths where the record already exists elsewhere.
    pub fn with_id(
        id: NoteId,
        owner_id: impl Into<String>,
        date: NaiveDate,
        text: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id,
            owner_id: owner_id.into(),
            date,
            text: text.into(),
            created_at,
            updated_at: created_at,
        };
        note.validate()?;
        Ok(note)
    }

    /// Checks the record invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.is_nil() {
            return Err(NoteValidationError::NilId);
        }
        if self.owner_id.trim().is_empty() {
            return Err(NoteValidationError::EmptyOwner);
        }
        if self.text.trim().is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        if self.updated_at < self.created_at {
            return Err(NoteValidationError::InvalidTimestamps {
                created_at: self.created_at,
                updated_at: self.updated_at,
            });
        }
        Ok(())
    }

    /// Single-line summary of `text` for compact views.
    pub fn preview(&self) -> String {
        note_preview(&self.text)
    }
}

/// Collapses whitespace and keeps the first 100 characters.
pub fn note_preview(text: &str) -> String {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let trimmed = collapsed.trim();
    let mut preview: String = trimmed.chars().take(NOTE_PREVIEW_MAX_CHARS).collect();
    if trimmed.chars().count() > NOTE_PREVIEW_MAX_CHARS {
        preview.push_str("...");
    }
    preview
}

/// Current time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
