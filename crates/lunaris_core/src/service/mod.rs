//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into journal use-cases.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod journal_service;
