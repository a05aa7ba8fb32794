//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide per-owner note CRUD over the `notes` table.
//! - Serve day-range reads for calendar projections.
//!
//! # Invariants
//! - `(owner_id, day)` is unique; a second insert maps to `RepoError::Conflict`.
//! - Owner listings are sorted by `created_at DESC, uuid ASC`.
//! - Range listings are sorted by `day ASC`.

use crate::db::DbError;
use crate::model::day::{format_calendar_day, parse_calendar_day};
use crate::model::note::{Note, NoteId, NoteValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    owner_id,
    day,
    text,
    created_at,
    updated_at
FROM notes";

const NOTE_COLUMNS: [&str; 6] = ["uuid", "owner_id", "day", "text", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    NotFound(NoteId),
    /// A note already exists for this owner and day.
    Conflict {
        owner_id: String,
        date: NaiveDate,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Conflict { date, .. } => {
                write!(f, "a note already exists for {}", format_calendar_day(*date))
            }
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for journal notes.
pub trait NoteRepository {
    /// Inserts one note and returns its id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Replaces note text and bumps `updated_at`.
    fn update_note_text(&self, id: NoteId, text: &str, updated_at: i64) -> RepoResult<()>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Gets the owner's note for one calendar day.
    fn get_note_for_date(&self, owner_id: &str, date: NaiveDate) -> RepoResult<Option<Note>>;
    /// Lists all notes of one owner, newest first.
    fn list_notes(&self, owner_id: &str) -> RepoResult<Vec<Note>>;
    /// Lists the owner's notes with `start <= day <= end`.
    fn list_notes_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Note>>;
    /// Removes a note permanently.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// Fails when the `notes` table or one of its columns is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO notes (uuid, owner_id, day, text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note.id.to_string(),
                note.owner_id.as_str(),
                format_calendar_day(note.date),
                note.text.as_str(),
                note.created_at,
                note.updated_at,
            ],
        );

        match inserted {
            Ok(_) => Ok(note.id),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Conflict {
                owner_id: note.owner_id.clone(),
                date: note.date,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn update_note_text(&self, id: NoteId, text: &str, updated_at: i64) -> RepoResult<()> {
        if text.trim().is_empty() {
            return Err(NoteValidationError::EmptyText.into());
        }

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                text = ?2,
                updated_at = MAX(created_at, ?3)
             WHERE uuid = ?1;",
            params![id.to_string(), text, updated_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn get_note_for_date(&self, owner_id: &str, date: NaiveDate) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_id = ?1
               AND day = ?2
             ORDER BY updated_at DESC, uuid ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![owner_id, format_calendar_day(date)])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_notes(&self, owner_id: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at DESC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn list_notes_between(
        &self,
        owner_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL}
             WHERE owner_id = ?1
               AND day >= ?2
               AND day <= ?3
             ORDER BY day ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![
            owner_id,
            format_calendar_day(start),
            format_calendar_day(end)
        ])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let day_text: String = row.get("day")?;
    let date = parse_calendar_day(&day_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid day value `{day_text}` in notes.day"))
    })?;

    let note = Note {
        id,
        owner_id: row.get("owner_id")?,
        date,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    note.validate()?;
    Ok(note)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }
    for column in NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
