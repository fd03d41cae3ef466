// ABOUTME: Conversation engine driving the multi-turn task flows
// ABOUTME: Maps inbound commands and text plus session state to replies and store writes

mod session;


pub use session::{AddTaskState, DoneTaskState, SessionState};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use promemoria_core::parse_due_date;
use promemoria_tasks::{TaskStorage, Urgency};

use crate::commands::Command;
use crate::replies;

/// Per-owner conversational state machine over the task store.
///
/// Synchronous from the gateway's point of view: one inbound message maps to
/// a new session state and at most one reply, with no blocking beyond the
/// store call on a flow's commit step.
pub struct ConversationEngine {
    sessions: Mutex<HashMap<i64, SessionState>>,
    tasks: Arc<TaskStorage>,
}

impl ConversationEngine {
    pub fn new(tasks: Arc<TaskStorage>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            tasks,
        }
    }

    /// Handle a recognized command. Returns the reply to send, if any.
    pub async fn on_command(&self, owner_id: i64, command: Command) -> Option<String> {
        match command {
            Command::Start => {
                info!("Owner {} used /start", owner_id);
                Some(replies::WELCOME.to_string())
            }
            Command::Help => {
                info!("Owner {} used /help", owner_id);
                Some(replies::HELP.to_string())
            }
            Command::Tasks => Some(self.list_open_tasks(owner_id).await),
            Command::AddTask => {
                // An entry command silently replaces any in-progress session
                let mut sessions = self.sessions.lock().await;
                sessions.insert(owner_id, SessionState::AddTask(AddTaskState::AwaitingText));
                Some(replies::ASK_TEXT.to_string())
            }
            Command::DoneTask => {
                let mut sessions = self.sessions.lock().await;
                sessions.insert(owner_id, SessionState::DoneTask(DoneTaskState::AwaitingId));
                Some(replies::ASK_ID.to_string())
            }
            Command::Cancel => {
                let mut sessions = self.sessions.lock().await;
                sessions
                    .remove(&owner_id)
                    .map(|_| replies::CANCELLED.to_string())
            }
        }
    }

    /// Handle plain (non-command) text. Advances the owner's active flow;
    /// text with no session behind it is dropped without a reply.
    pub async fn on_text(&self, owner_id: i64, text: &str) -> Option<String> {
        // The lock spans the whole read-modify-write, including the store
        // call on the commit step: session updates must be serialized.
        let mut sessions = self.sessions.lock().await;
        let state = sessions.remove(&owner_id)?;

        let (next, reply) = match state {
            SessionState::AddTask(state) => self.advance_add_task(owner_id, state, text).await,
            SessionState::DoneTask(DoneTaskState::AwaitingId) => {
                self.advance_done_task(owner_id, text).await
            }
        };

        if let Some(next) = next {
            sessions.insert(owner_id, next);
        }
        Some(reply)
    }

    /// Transition function for the intake flow. Invalid input re-prompts and
    /// holds the stage, keeping already-collected fields.
    async fn advance_add_task(
        &self,
        owner_id: i64,
        state: AddTaskState,
        input: &str,
    ) -> (Option<SessionState>, String) {
        match state {
            AddTaskState::AwaitingText => {
                let text = input.trim();
                if text.is_empty() {
                    // The store requires non-empty text; hold the stage
                    return (
                        Some(SessionState::AddTask(AddTaskState::AwaitingText)),
                        replies::ASK_TEXT.to_string(),
                    );
                }
                (
                    Some(SessionState::AddTask(AddTaskState::AwaitingUrgency {
                        text: text.to_string(),
                    })),
                    replies::ASK_URGENCY.to_string(),
                )
            }
            AddTaskState::AwaitingUrgency { text } => match Urgency::from_user_input(input) {
                Some(urgency) => (
                    Some(SessionState::AddTask(AddTaskState::AwaitingDueDate {
                        text,
                        urgency,
                    })),
                    replies::ASK_DUE_DATE.to_string(),
                ),
                None => (
                    Some(SessionState::AddTask(AddTaskState::AwaitingUrgency { text })),
                    replies::URGENCY_RETRY.to_string(),
                ),
            },
            AddTaskState::AwaitingDueDate { text, urgency } => match parse_due_date(input) {
                Ok(due_at) => {
                    match self
                        .tasks
                        .create_task(owner_id, &text, urgency, Some(due_at))
                        .await
                    {
                        Ok(id) => {
                            info!("Owner {} created task {}", owner_id, id);
                            (None, replies::task_added(id, urgency, due_at))
                        }
                        Err(e) => {
                            // Abort the flow rather than leaving a dangling session
                            error!("Failed to store task for owner {}: {}", owner_id, e);
                            (None, replies::GENERIC_FAILURE.to_string())
                        }
                    }
                }
                Err(_) => (
                    Some(SessionState::AddTask(AddTaskState::AwaitingDueDate {
                        text,
                        urgency,
                    })),
                    replies::DUE_DATE_RETRY.to_string(),
                ),
            },
        }
    }

    /// Transition function for the completion flow: a single id-collecting
    /// stage that ends the session on anything but a malformed id.
    async fn advance_done_task(&self, owner_id: i64, input: &str) -> (Option<SessionState>, String) {
        let id = match input.trim().parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                return (
                    Some(SessionState::DoneTask(DoneTaskState::AwaitingId)),
                    replies::ID_RETRY.to_string(),
                )
            }
        };

        match self.tasks.get_task(owner_id, id).await {
            Ok(None) => (None, replies::NOT_FOUND.to_string()),
            Ok(Some(_)) => match self.tasks.mark_done(owner_id, id).await {
                Ok(Some(task)) => {
                    info!("Owner {} completed task {}", owner_id, id);
                    (None, replies::task_completed(&task.text))
                }
                Ok(None) => (None, replies::NOT_FOUND.to_string()),
                Err(e) => {
                    error!("Failed to mark task {} done for owner {}: {}", id, owner_id, e);
                    (None, replies::GENERIC_FAILURE.to_string())
                }
            },
            Err(e) => {
                error!("Failed to look up task {} for owner {}: {}", id, owner_id, e);
                (None, replies::GENERIC_FAILURE.to_string())
            }
        }
    }

    async fn list_open_tasks(&self, owner_id: i64) -> String {
        info!("Owner {} used /tasks", owner_id);
        match self.tasks.list_open_tasks(owner_id).await {
            Ok(tasks) if tasks.is_empty() => replies::NO_TASKS.to_string(),
            Ok(tasks) => replies::open_tasks(&tasks),
            Err(e) => {
                error!("Failed to list tasks for owner {}: {}", owner_id, e);
                replies::GENERIC_FAILURE.to_string()
            }
        }
    }

    #[cfg(test)]
    pub(crate) async fn session_of(&self, owner_id: i64) -> Option<SessionState> {
        self.sessions.lock().await.get(&owner_id).cloned()
    }
}
