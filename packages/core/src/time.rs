// ABOUTME: Naive-local clock and due-date text format
// ABOUTME: Single source for the YYYY-MM-DD HH:MM format users type and see

use chrono::{Local, NaiveDateTime, ParseError};

/// Due dates are typed and displayed as `YYYY-MM-DD HH:MM`, minute
/// precision, no timezone.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current wall-clock time as a naive local timestamp.
///
/// All timestamps in Promemoria are naive local time; due-date comparisons
/// and `created_at` both come from this clock.
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse user input as a due date, strictly.
///
/// Anything that doesn't match [`DUE_DATE_FORMAT`] is an error; callers
/// re-prompt rather than guessing.
pub fn parse_due_date(input: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(input.trim(), DUE_DATE_FORMAT)
}

/// Format a due date for user-facing messages.
pub fn format_due_date(due_at: NaiveDateTime) -> String {
    due_at.format(DUE_DATE_FORMAT).to_string()
}
