//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for notes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths enforce `Note::validate()` before persistence.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod note_repo;
