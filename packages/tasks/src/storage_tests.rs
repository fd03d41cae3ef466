// ABOUTME: Integration tests for the task storage layer
// ABOUTME: Covers owner scoping, lenient re-marking and the due-soon window

use chrono::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use promemoria_core::{now_local, parse_due_date};

use crate::storage::TaskStorage;
use crate::types::Urgency;

async fn setup_test_db() -> TaskStorage {
    // Create in-memory database
    let options = SqliteConnectOptions::from_str(":memory:")
        .unwrap()
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    // Run migrations
    sqlx::migrate!("../storage/migrations")
        .run(&pool)
        .await
        .unwrap();

    TaskStorage::new(pool)
}

#[tokio::test]
async fn test_create_task_round_trip() {
    let storage = setup_test_db().await;
    let due = parse_due_date("2030-01-01 10:00").unwrap();

    let id = storage
        .create_task(42, "Buy milk", Urgency::High, Some(due))
        .await
        .unwrap();

    let task = storage.get_task(42, id).await.unwrap().unwrap();
    assert_eq!(task.id, id);
    assert_eq!(task.owner_id, 42);
    assert_eq!(task.text, "Buy milk");
    assert_eq!(task.urgency, Urgency::High);
    assert_eq!(task.due_at, Some(due));
    assert!(!task.done);
}

#[tokio::test]
async fn test_get_task_is_owner_scoped() {
    let storage = setup_test_db().await;
    let due = parse_due_date("2030-01-01 10:00").unwrap();

    let id = storage
        .create_task(1, "secret", Urgency::Low, Some(due))
        .await
        .unwrap();

    // The id exists, but owner 2 must not see it
    assert!(storage.get_task(2, id).await.unwrap().is_none());
    assert!(storage.get_task(1, id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_mark_done_flips_once_and_stays() {
    let storage = setup_test_db().await;
    let due = parse_due_date("2030-01-01 10:00").unwrap();

    let id = storage
        .create_task(7, "laundry", Urgency::Medium, Some(due))
        .await
        .unwrap();

    let task = storage.mark_done(7, id).await.unwrap().unwrap();
    assert!(task.done);
    assert_eq!(task.text, "laundry");

    // Re-marking succeeds silently and re-returns the row
    let again = storage.mark_done(7, id).await.unwrap().unwrap();
    assert!(again.done);
    assert_eq!(again.id, id);
}

#[tokio::test]
async fn test_mark_done_rejects_foreign_owner() {
    let storage = setup_test_db().await;
    let due = parse_due_date("2030-01-01 10:00").unwrap();

    let id = storage
        .create_task(1, "mine", Urgency::Low, Some(due))
        .await
        .unwrap();

    assert!(storage.mark_done(2, id).await.unwrap().is_none());

    // The row must be untouched
    let task = storage.get_task(1, id).await.unwrap().unwrap();
    assert!(!task.done);
}

#[tokio::test]
async fn test_list_open_tasks_orders_by_due_date_and_skips_done() {
    let storage = setup_test_db().await;

    assert!(storage.list_open_tasks(5).await.unwrap().is_empty());

    let later = parse_due_date("2030-06-01 09:00").unwrap();
    let sooner = parse_due_date("2030-01-01 09:00").unwrap();

    storage
        .create_task(5, "later", Urgency::Low, Some(later))
        .await
        .unwrap();
    storage
        .create_task(5, "sooner", Urgency::High, Some(sooner))
        .await
        .unwrap();
    let done_id = storage
        .create_task(5, "finished", Urgency::Low, Some(sooner))
        .await
        .unwrap();
    storage.mark_done(5, done_id).await.unwrap();
    storage
        .create_task(6, "someone else's", Urgency::Low, Some(sooner))
        .await
        .unwrap();

    let tasks = storage.list_open_tasks(5).await.unwrap();
    let texts: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["sooner", "later"]);
}

#[tokio::test]
async fn test_list_due_soon_window() {
    let storage = setup_test_db().await;
    let now = now_local();
    let horizon = Duration::minutes(10);

    storage
        .create_task(1, "due in 5", Urgency::High, Some(now + Duration::minutes(5)))
        .await
        .unwrap();
    storage
        .create_task(2, "due in 15", Urgency::High, Some(now + Duration::minutes(15)))
        .await
        .unwrap();
    let done_id = storage
        .create_task(3, "done but due", Urgency::High, Some(now + Duration::minutes(5)))
        .await
        .unwrap();
    storage.mark_done(3, done_id).await.unwrap();

    let due = storage.list_due_soon(now, horizon).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].owner_id, 1);
    assert_eq!(due[0].text, "due in 5");
}

#[tokio::test]
async fn test_list_due_soon_bounds_are_inclusive() {
    let storage = setup_test_db().await;
    // Pin `now` to a parsed timestamp so the window edges land exactly
    let now = parse_due_date("2030-01-01 10:00").unwrap();
    let horizon = Duration::minutes(10);

    storage
        .create_task(1, "at now", Urgency::Low, Some(now))
        .await
        .unwrap();
    storage
        .create_task(1, "at horizon", Urgency::Low, Some(now + horizon))
        .await
        .unwrap();
    storage
        .create_task(1, "just past", Urgency::Low, Some(now + horizon + Duration::minutes(1)))
        .await
        .unwrap();
    storage
        .create_task(1, "already overdue", Urgency::Low, Some(now - Duration::minutes(1)))
        .await
        .unwrap();

    let due = storage.list_due_soon(now, horizon).await.unwrap();
    let mut texts: Vec<&str> = due.iter().map(|t| t.text.as_str()).collect();
    texts.sort();
    assert_eq!(texts, vec!["at horizon", "at now"]);
}

#[tokio::test]
async fn test_list_due_soon_spans_all_owners() {
    let storage = setup_test_db().await;
    let now = now_local();
    let soon = now + Duration::minutes(3);

    storage
        .create_task(10, "a", Urgency::Low, Some(soon))
        .await
        .unwrap();
    storage
        .create_task(20, "b", Urgency::High, Some(soon))
        .await
        .unwrap();

    let due = storage.list_due_soon(now, Duration::minutes(10)).await.unwrap();
    let mut owners: Vec<i64> = due.iter().map(|t| t.owner_id).collect();
    owners.sort();
    assert_eq!(owners, vec![10, 20]);
}
