mod common;

use futures_util::FutureExt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use matchstats_sync::error::SyncError;
use matchstats_sync::jobs::retry::{JobOutcome, RetryPolicy};
use matchstats_sync::jobs::scheduler::{JobState, Routine, Scheduler};
use matchstats_sync::models::sync_log::SyncStatus;
use matchstats_sync::services::sync_log;

fn counting_routine(counter: Arc<AtomicU32>, work: Duration) -> Routine {
    Arc::new(move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(work).await;
            Ok::<u64, SyncError>(1)
        }
        .boxed()
    })
}

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        backoff_base: 2,
        backoff_unit: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_run_now_is_single_flight() {
    let db = common::setup_test_db().await.unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let mut scheduler = Scheduler::new(db, policy());
    scheduler
        .register(
            "football_data",
            "results",
            Duration::from_secs(300),
            counting_routine(counter.clone(), Duration::from_millis(200)),
        )
        .unwrap();

    let (first, second) = tokio::join!(
        scheduler.run_now("football_data.results"),
        scheduler.run_now("football_data.results"),
    );

    let outcomes = [first.unwrap(), second.unwrap()];
    assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    let status = &scheduler.jobs()[0];
    assert_eq!(status.state, JobState::Idle);
    assert_eq!(status.last_outcome, Some(JobOutcome::Success { records: 1 }));
}

#[tokio::test]
async fn test_unknown_and_duplicate_jobs_are_rejected() {
    let db = common::setup_test_db().await.unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let mut scheduler = Scheduler::new(db, policy());

    let routine = counting_routine(counter, Duration::ZERO);
    scheduler
        .register("sporttery", "matches", Duration::from_secs(60), routine.clone())
        .unwrap();

    assert!(scheduler
        .register("sporttery", "matches", Duration::from_secs(60), routine.clone())
        .is_err());
    assert!(scheduler
        .register("sporttery", "results", Duration::ZERO, routine)
        .is_err());
    assert!(scheduler.run_now("sporttery.unknown").await.is_err());
}

#[tokio::test]
async fn test_stop_disarms_timers() {
    let db = common::setup_test_db().await.unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let mut scheduler = Scheduler::new(db, policy());
    scheduler
        .register(
            "football_data",
            "live_scores",
            Duration::from_millis(50),
            counting_routine(counter.clone(), Duration::ZERO),
        )
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(180)).await;
    scheduler.stop();
    scheduler.wait().await;

    let runs = counter.load(Ordering::SeqCst);
    assert!(runs >= 2, "expected repeated runs, got {}", runs);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(counter.load(Ordering::SeqCst), runs);
}

#[tokio::test]
async fn test_stop_lets_in_flight_run_finish() {
    let db = common::setup_test_db().await.unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let mut scheduler = Scheduler::new(db.clone(), policy());
    scheduler
        .register(
            "football_data",
            "teams",
            Duration::from_secs(3600),
            counting_routine(counter.clone(), Duration::from_millis(150)),
        )
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    scheduler.stop();
    scheduler.wait().await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    let last = sync_log::last_success_for_task(&db, "football_data", "teams")
        .await
        .unwrap();
    assert!(last.is_some());
}

#[tokio::test]
async fn test_recent_success_delays_first_run() {
    let db = common::setup_test_db().await.unwrap();
    sync_log::log_sync(&db, "football_data", "standings", SyncStatus::Success, Some(20), None, None)
        .await
        .unwrap();

    let counter = Arc::new(AtomicU32::new(0));
    let mut scheduler = Scheduler::new(db, policy());
    scheduler
        .register(
            "football_data",
            "standings",
            Duration::from_secs(3600),
            counting_routine(counter.clone(), Duration::ZERO),
        )
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    scheduler.stop();
    scheduler.wait().await;

    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_second_start_does_not_add_timers() {
    let db = common::setup_test_db().await.unwrap();
    let counter = Arc::new(AtomicU32::new(0));

    let mut scheduler = Scheduler::new(db, policy());
    scheduler
        .register(
            "football_data",
            "live_scores",
            Duration::from_millis(100),
            counting_routine(counter.clone(), Duration::ZERO),
        )
        .unwrap();

    scheduler.start().await;
    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    scheduler.stop();
    scheduler.wait().await;

    // Ticks at 0, 100 and 200 ms from a single timer
    let runs = counter.load(Ordering::SeqCst);
    assert!((2..=3).contains(&runs), "expected one timer, got {} runs", runs);
}

#[tokio::test]
async fn test_fast_job_keeps_cadence_while_slow_job_runs() {
    let db = common::setup_test_db().await.unwrap();
    let fast = Arc::new(AtomicU32::new(0));
    let slow = Arc::new(AtomicU32::new(0));

    let mut scheduler = Scheduler::new(db, policy());
    scheduler
        .register(
            "football_data",
            "live_scores",
            Duration::from_millis(50),
            counting_routine(fast.clone(), Duration::ZERO),
        )
        .unwrap();
    scheduler
        .register(
            "football_data",
            "teams",
            Duration::from_secs(3600),
            counting_routine(slow.clone(), Duration::from_millis(400)),
        )
        .unwrap();

    scheduler.start().await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    // The slow job is still inside its first run
    assert_eq!(slow.load(Ordering::SeqCst), 1);
    assert_eq!(scheduler.jobs()[1].state, JobState::Running);
    let fast_runs = fast.load(Ordering::SeqCst);
    assert!(fast_runs >= 3, "fast job stalled at {} runs", fast_runs);

    scheduler.stop();
    scheduler.wait().await;
    assert_eq!(slow.load(Ordering::SeqCst), 1);
}
