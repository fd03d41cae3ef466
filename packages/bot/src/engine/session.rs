// ABOUTME: Per-owner conversation session states
// ABOUTME: Tagged unions carrying each flow's draft inside its stage

use promemoria_tasks::Urgency;

/// Active flow for one owner. The draft travels inside the variant, so a
/// session can never hold fields belonging to the wrong stage.
///
/// Exactly one session per owner; an entry command replaces whatever was
/// there. No session at all means no flow is active.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    AddTask(AddTaskState),
    DoneTask(DoneTaskState),
}

/// Intake flow: description, then urgency, then due date, committing on the
/// last step.
#[derive(Debug, Clone, PartialEq)]
pub enum AddTaskState {
    AwaitingText,
    AwaitingUrgency { text: String },
    AwaitingDueDate { text: String, urgency: Urgency },
}

/// Completion flow: a single stage collecting the task id.
#[derive(Debug, Clone, PartialEq)]
pub enum DoneTaskState {
    AwaitingId,
}
