// ABOUTME: Task type definitions
// ABOUTME: Structures for persisted tasks and the notifier's due-task read model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Task urgency, collected during intake from the Italian labels users type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Map user input to an urgency level. Case-insensitive match against
    /// the Italian labels; anything else is rejected so the caller can
    /// re-prompt.
    pub fn from_user_input(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "bassa" => Some(Urgency::Low),
            "media" => Some(Urgency::Medium),
            "alta" => Some(Urgency::High),
            _ => None,
        }
    }

    /// The Italian label shown back to users.
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::Low => "bassa",
            Urgency::Medium => "media",
            Urgency::High => "alta",
        }
    }
}

/// A persisted task row.
///
/// `id` and every field except `done` are immutable after creation; `done`
/// flips to true once via the completion flow and never reverts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub owner_id: i64,
    pub text: String,
    pub urgency: Urgency,
    /// Naive local timestamp, minute precision. Nullable in the schema but
    /// always supplied by the intake flow.
    pub due_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub done: bool,
}

/// Read model returned by the due-task sweep: just enough to address and
/// compose one reminder.
#[derive(Debug, Clone)]
pub struct DueTask {
    pub owner_id: i64,
    pub text: String,
    pub due_at: NaiveDateTime,
}
