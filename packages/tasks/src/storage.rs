// ABOUTME: Task storage layer using SQLite
// ABOUTME: Handles CRUD operations for tasks plus the notifier's due-soon sweep

use chrono::{Duration, NaiveDateTime};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use promemoria_core::now_local;
use promemoria_storage::StorageError;

use crate::types::{DueTask, Task, Urgency};

pub struct TaskStorage {
    pool: SqlitePool,
}

impl TaskStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new task and return its id.
    ///
    /// `text` and `urgency` are validated by the caller (the conversation
    /// engine re-prompts until they are acceptable). The row is durable when
    /// this returns; callers acknowledge the user only afterwards.
    pub async fn create_task(
        &self,
        owner_id: i64,
        text: &str,
        urgency: Urgency,
        due_at: Option<NaiveDateTime>,
    ) -> Result<i64, StorageError> {
        debug!("Creating task for owner: {}", owner_id);

        let created_at = now_local();

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (owner_id, text, urgency, due_at, created_at, done)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(owner_id)
        .bind(text)
        .bind(urgency)
        .bind(due_at)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.last_insert_rowid())
    }

    /// All undone tasks for one owner, soonest due date first, tasks with no
    /// due date last. Returns an empty vec (not an error) when none exist.
    pub async fn list_open_tasks(&self, owner_id: i64) -> Result<Vec<Task>, StorageError> {
        debug!("Listing open tasks for owner: {}", owner_id);

        let rows = sqlx::query(
            r#"
            SELECT id, owner_id, text, urgency, due_at, created_at, done
            FROM tasks
            WHERE owner_id = ? AND done = 0
            ORDER BY due_at IS NULL, due_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(self.row_to_task(&row)?);
        }

        Ok(tasks)
    }

    /// Point lookup scoped to the owner. An id that exists but belongs to
    /// another owner is `None`, never the foreign row.
    pub async fn get_task(&self, owner_id: i64, id: i64) -> Result<Option<Task>, StorageError> {
        debug!("Fetching task {} for owner: {}", id, owner_id);

        let row = sqlx::query(
            r#"
            SELECT id, owner_id, text, urgency, due_at, created_at, done
            FROM tasks
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => Ok(Some(self.row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    /// Flip a task to done and return it, or `None` when the id is absent or
    /// owned by someone else. Re-marking an already-done task succeeds
    /// silently and re-returns the row (lenient, intentional).
    pub async fn mark_done(&self, owner_id: i64, id: i64) -> Result<Option<Task>, StorageError> {
        debug!("Marking task {} done for owner: {}", id, owner_id);

        let task = match self.get_task(owner_id, id).await? {
            Some(task) => task,
            None => return Ok(None),
        };

        sqlx::query("UPDATE tasks SET done = 1 WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(Some(Task { done: true, ..task }))
    }

    /// Every undone task, across all owners, whose due date falls inside
    /// `[now, now + horizon]` inclusive.
    ///
    /// This fetches all undone rows and applies the window here: the sweep
    /// is a deliberate full scan, no secondary index is assumed.
    pub async fn list_due_soon(
        &self,
        now: NaiveDateTime,
        horizon: Duration,
    ) -> Result<Vec<DueTask>, StorageError> {
        debug!("Scanning undone tasks due by {}", now + horizon);

        let rows = sqlx::query("SELECT owner_id, text, due_at FROM tasks WHERE done = 0")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let deadline = now + horizon;
        let mut due = Vec::new();
        for row in rows {
            let due_at: Option<NaiveDateTime> = row.try_get("due_at")?;
            if let Some(due_at) = due_at {
                if now <= due_at && due_at <= deadline {
                    due.push(DueTask {
                        owner_id: row.try_get("owner_id")?,
                        text: row.try_get("text")?,
                        due_at,
                    });
                }
            }
        }

        Ok(due)
    }

    fn row_to_task(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Task, StorageError> {
        Ok(Task {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            text: row.try_get("text")?,
            urgency: row.try_get("urgency")?,
            due_at: row.try_get("due_at")?,
            created_at: row.try_get("created_at")?,
            done: row.try_get("done")?,
        })
    }
}
