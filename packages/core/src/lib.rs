// ABOUTME: Core constants and utilities for Promemoria
// ABOUTME: Foundational package providing shared functionality across all Promemoria packages

pub mod constants;
pub mod time;

// Re-export constants
pub use constants::{database_file, promemoria_dir};

// Re-export time helpers
pub use time::{format_due_date, now_local, parse_due_date, DUE_DATE_FORMAT};
