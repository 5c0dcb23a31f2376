mod common;

use sea_orm::{EntityTrait, QueryOrder};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use matchstats_sync::entities::prelude::SyncLogs;
use matchstats_sync::entities::sync_logs;
use matchstats_sync::error::{SourceError, SyncError};
use matchstats_sync::jobs::retry::{run_with_retry, JobOutcome, RetryPolicy};

fn fast_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        backoff_base: 2,
        backoff_unit: Duration::from_millis(10),
    }
}

async fn log_rows(db: &sea_orm::DatabaseConnection) -> Vec<sync_logs::Model> {
    SyncLogs::find()
        .order_by_asc(sync_logs::Column::Id)
        .all(db)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_exhausted_retries_are_logged_and_swallowed() {
    let db = common::setup_test_db().await.unwrap();
    let calls = AtomicU32::new(0);

    let outcome = run_with_retry(&db, "football_data", "results", &fast_policy(3), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err::<u64, _>(SyncError::Source(SourceError::RateLimited)) }
    })
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(matches!(outcome, JobOutcome::Failed { ref error } if error.contains("rate limited")));

    let rows = log_rows(&db).await;
    let statuses: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["running", "retrying", "retrying", "failed"]);
    assert_eq!(rows[1].retry_count, 1);
    assert_eq!(rows[2].retry_count, 2);
    assert_eq!(rows[3].retry_count, 3);
    assert!(rows[3].error_message.as_deref().unwrap().contains("rate limited"));
    assert!(rows[0].finished_at.is_some());
}

#[tokio::test]
async fn test_success_on_third_attempt() {
    let db = common::setup_test_db().await.unwrap();
    let calls = AtomicU32::new(0);

    let outcome = run_with_retry(&db, "football_data", "standings", &fast_policy(3), || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt < 2 {
                Err(SyncError::Job(format!("attempt {} failed", attempt)))
            } else {
                Ok(7)
            }
        }
    })
    .await;

    assert_eq!(outcome, JobOutcome::Success { records: 7 });

    let rows = log_rows(&db).await;
    let statuses: Vec<&str> = rows.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(statuses, vec!["running", "retrying", "retrying", "success"]);
    assert_eq!(rows[1].retry_count, 1);
    assert_eq!(rows[2].retry_count, 2);
    assert_eq!(rows[3].records_count, 7);
    assert!(rows[0].finished_at.is_some());
    assert!(rows[3].finished_at.is_none());
}

#[tokio::test]
async fn test_first_attempt_success_writes_two_rows() {
    let db = common::setup_test_db().await.unwrap();

    let outcome = run_with_retry(&db, "sporttery", "matches", &fast_policy(3), || async {
        Ok::<u64, SyncError>(0)
    })
    .await;

    assert_eq!(outcome, JobOutcome::Success { records: 0 });
    let statuses: Vec<String> = log_rows(&db).await.into_iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec!["running", "success"]);
}

#[tokio::test]
async fn test_backoff_waits_grow_between_attempts() {
    let db = common::setup_test_db().await.unwrap();
    let policy = fast_policy(3);
    let started = Instant::now();
    let attempts = parking_lot::Mutex::new(Vec::new());

    run_with_retry(&db, "football_data", "scorers", &policy, || {
        attempts.lock().push(started.elapsed());
        async { Err::<u64, _>(SyncError::Job("down".to_string())) }
    })
    .await;

    let attempts = attempts.lock().clone();
    assert_eq!(attempts.len(), 3);
    // unit * 2^1 before the second attempt, unit * 2^2 before the third
    assert!(attempts[1] - attempts[0] >= policy.backoff(1));
    assert!(attempts[2] - attempts[1] >= policy.backoff(2));
    assert!(started.elapsed() >= Duration::from_millis(60));
}
