// ABOUTME: Background due-task notifier
// ABOUTME: Fixed-cadence sweep pushing reminders for tasks about to fall due

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::{Notify, RwLock};
use tokio::time;
use tracing::{debug, error, info, warn};

use promemoria_core::now_local;
use promemoria_storage::StorageError;
use promemoria_tasks::TaskStorage;

use crate::gateway::MessagingGateway;
use crate::replies;

/// Wait a little before the first sweep so startup can finish.
const STARTUP_GRACE: Duration = Duration::from_secs(5);

/// Fixed pause between sweeps, regardless of how long a sweep took.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Tasks falling due within this lookahead are "due soon".
const DUE_HORIZON_MINUTES: i64 = 10;

/// Background reminder loop over the task store.
///
/// Started once at process startup and stopped at shutdown; shares the store
/// with the conversation engine through short-lived per-operation access and
/// never holds anything across a full sweep.
pub struct DueNotifier {
    tasks: Arc<TaskStorage>,
    gateway: Arc<dyn MessagingGateway>,
    running: Arc<RwLock<bool>>,
    shutdown: Arc<Notify>,
}

impl DueNotifier {
    pub fn new(tasks: Arc<TaskStorage>, gateway: Arc<dyn MessagingGateway>) -> Self {
        Self {
            tasks,
            gateway,
            running: Arc::new(RwLock::new(false)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Start the notifier task. Does nothing if already running.
    pub async fn start(&self) {
        let mut running = self.running.write().await;
        if *running {
            return;
        }
        *running = true;
        drop(running);

        let tasks = self.tasks.clone();
        let gateway = self.gateway.clone();
        let running_flag = self.running.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            info!("Due-task notifier started");

            // Initial grace period before the first sweep
            tokio::select! {
                _ = shutdown.notified() => {
                    info!("Due-task notifier stopped");
                    return;
                }
                _ = time::sleep(STARTUP_GRACE) => {}
            }

            loop {
                if !*running_flag.read().await {
                    break;
                }

                // A failed sweep is logged and retried at the next interval;
                // the loop itself never dies on a transient error.
                match Self::sweep(&tasks, gateway.as_ref(), now_local()).await {
                    Ok(0) => {}
                    Ok(count) => debug!("Sweep attempted {} reminder deliveries", count),
                    Err(e) => error!("Due-task sweep failed: {}", e),
                }

                // Fixed cadence, interruptible at the sleep point
                tokio::select! {
                    _ = shutdown.notified() => break,
                    _ = time::sleep(SWEEP_INTERVAL) => {}
                }
            }

            info!("Due-task notifier stopped");
        });
    }

    /// Stop the notifier task, waking it if it is sleeping.
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
        self.shutdown.notify_one();
    }

    /// One query-and-notify cycle: every undone task due within the horizon
    /// gets one reminder attempt, addressed to its owner. Delivery failures
    /// are logged per recipient and never abort the rest of the sweep.
    /// Returns the number of attempts.
    ///
    /// There is no deduplication: a task sitting inside the rolling window
    /// is re-notified on every sweep until it falls due or is marked done.
    pub async fn sweep(
        tasks: &TaskStorage,
        gateway: &dyn MessagingGateway,
        now: NaiveDateTime,
    ) -> Result<usize, StorageError> {
        let due = tasks
            .list_due_soon(now, chrono::Duration::minutes(DUE_HORIZON_MINUTES))
            .await?;

        let mut attempts = 0;
        for task in due {
            attempts += 1;
            let reminder = replies::reminder(&task.text, task.due_at);
            if let Err(e) = gateway.send_text(task.owner_id, &reminder).await {
                warn!("Failed to deliver reminder to {}: {}", task.owner_id, e);
            }
        }

        Ok(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use promemoria_tasks::Urgency;

    use crate::gateway::{GatewayError, MockMessagingGateway};

    async fn setup_storage() -> TaskStorage {
        let options = SqliteConnectOptions::from_str(":memory:")
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::migrate!("../storage/migrations")
            .run(&pool)
            .await
            .unwrap();

        TaskStorage::new(pool)
    }

    #[tokio::test]
    async fn test_sweep_notifies_task_inside_window() {
        let storage = setup_storage().await;
        let now = now_local();
        storage
            .create_task(7, "pay rent", Urgency::High, Some(now + chrono::Duration::minutes(3)))
            .await
            .unwrap();

        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_text()
            .withf(|owner_id, text| *owner_id == 7 && text.contains("pay rent"))
            .times(1)
            .returning(|_, _| Ok(()));

        let attempts = DueNotifier::sweep(&storage, &gateway, now).await.unwrap();
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_sweep_skips_far_and_done_tasks() {
        let storage = setup_storage().await;
        let now = now_local();

        storage
            .create_task(1, "far away", Urgency::Low, Some(now + chrono::Duration::minutes(15)))
            .await
            .unwrap();
        let done_id = storage
            .create_task(2, "already done", Urgency::Low, Some(now + chrono::Duration::minutes(5)))
            .await
            .unwrap();
        storage.mark_done(2, done_id).await.unwrap();

        let mut gateway = MockMessagingGateway::new();
        gateway.expect_send_text().times(0);

        let attempts = DueNotifier::sweep(&storage, &gateway, now).await.unwrap();
        assert_eq!(attempts, 0);
    }

    #[tokio::test]
    async fn test_repeated_sweeps_renotify_without_dedup() {
        let storage = setup_storage().await;
        let now = now_local();
        storage
            .create_task(7, "still looming", Urgency::Medium, Some(now + chrono::Duration::minutes(5)))
            .await
            .unwrap();

        // The task stays inside the window, so each sweep sends again
        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_text()
            .times(2)
            .returning(|_, _| Ok(()));

        DueNotifier::sweep(&storage, &gateway, now).await.unwrap();
        DueNotifier::sweep(&storage, &gateway, now + chrono::Duration::minutes(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delivery_failure_does_not_abort_sweep() {
        let storage = setup_storage().await;
        let now = now_local();
        let soon = now + chrono::Duration::minutes(4);

        storage
            .create_task(1, "first", Urgency::Low, Some(soon))
            .await
            .unwrap();
        storage
            .create_task(2, "second", Urgency::Low, Some(soon))
            .await
            .unwrap();

        // One recipient is unreachable; the other must still be attempted
        let mut gateway = MockMessagingGateway::new();
        gateway
            .expect_send_text()
            .times(2)
            .returning(|owner_id, _| {
                if owner_id == 1 {
                    Err(GatewayError::Api("chat not found".to_string()))
                } else {
                    Ok(())
                }
            });

        let attempts = DueNotifier::sweep(&storage, &gateway, now).await.unwrap();
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn test_stop_interrupts_startup_grace() {
        let storage = Arc::new(setup_storage().await);
        let gateway: Arc<dyn MessagingGateway> = Arc::new({
            let mut mock = MockMessagingGateway::new();
            mock.expect_send_text().times(0);
            mock
        });

        let notifier = DueNotifier::new(storage, gateway);
        notifier.start().await;
        // Stopping during the grace period must end the task before any sweep
        notifier.stop().await;
        tokio::task::yield_now().await;
    }
}
