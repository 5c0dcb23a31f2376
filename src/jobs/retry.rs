//! Uniform retry envelope around every sync routine.
//!
//! A run appends `running`, then `retrying` before each further attempt, and finally
//! `success` or `failed` to the sync log. Errors never escape the envelope.

use sea_orm::DatabaseConnection;
use std::future::Future;
use std::time::Duration;

use crate::error::SyncError;
use crate::models::sync_log::SyncStatus;
use crate::services::sync_log;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per run
    pub max_retries: u32,
    pub backoff_base: u32,
    /// Duration of one backoff unit; the wait before attempt `n` is `unit * base^n`
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: u32) -> Self {
        Self {
            max_retries,
            backoff_base,
            backoff_unit: Duration::from_secs(1),
        }
    }

    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(self.backoff_base.saturating_pow(attempt))
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success { records: u64 },
    Failed { error: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}

async fn append(
    db: &DatabaseConnection,
    source: &str,
    task_type: &str,
    status: SyncStatus,
    records_count: Option<i64>,
    error_message: Option<&str>,
    retry_count: Option<i32>,
) -> Option<i32> {
    match sync_log::log_sync(
        db,
        source,
        task_type,
        status,
        records_count,
        error_message,
        retry_count,
    )
    .await
    {
        Ok(id) => Some(id),
        Err(e) => {
            tracing::error!("[{}.{}] Failed to write {} log entry: {}", source, task_type, status, e);
            None
        }
    }
}

async fn finish(db: &DatabaseConnection, source: &str, task_type: &str, running_id: Option<i32>) {
    if let Some(id) = running_id {
        if let Err(e) = sync_log::update_log_finish(db, id).await {
            tracing::error!("[{}.{}] Failed to finish log entry {}: {}", source, task_type, id, e);
        }
    }
}

/// Run `routine` under `policy`, recording every step in the sync log.
pub async fn run_with_retry<F, Fut>(
    db: &DatabaseConnection,
    source: &str,
    task_type: &str,
    policy: &RetryPolicy,
    mut routine: F,
) -> JobOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u64, SyncError>>,
{
    let running_id = append(db, source, task_type, SyncStatus::Running, None, None, None).await;
    tracing::info!("[{}.{}] Starting sync", source, task_type);

    let mut last_error = String::new();

    for attempt in 0..policy.attempts() {
        if attempt > 0 {
            let delay = policy.backoff(attempt);
            append(
                db,
                source,
                task_type,
                SyncStatus::Retrying,
                None,
                Some(&last_error),
                Some(attempt as i32),
            )
            .await;
            tracing::warn!(
                "[{}.{}] Retrying in {:?} (attempt {}/{})",
                source,
                task_type,
                delay,
                attempt + 1,
                policy.attempts()
            );
            tokio::time::sleep(delay).await;
        }

        match routine().await {
            Ok(records) => {
                finish(db, source, task_type, running_id).await;
                append(
                    db,
                    source,
                    task_type,
                    SyncStatus::Success,
                    Some(records as i64),
                    None,
                    Some(attempt as i32),
                )
                .await;
                tracing::info!("[{}.{}] Synced {} records", source, task_type, records);
                return JobOutcome::Success { records };
            }
            Err(e) => {
                tracing::warn!(
                    "[{}.{}] Attempt {} failed: {}",
                    source,
                    task_type,
                    attempt + 1,
                    e
                );
                last_error = e.to_string();
            }
        }
    }

    finish(db, source, task_type, running_id).await;
    append(
        db,
        source,
        task_type,
        SyncStatus::Failed,
        None,
        Some(&last_error),
        Some(policy.max_retries as i32),
    )
    .await;
    tracing::error!(
        "[{}.{}] Giving up after {} attempts: {}",
        source,
        task_type,
        policy.attempts(),
        last_error
    );

    JobOutcome::Failed { error: last_error }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_geometrically() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = RetryPolicy::new(3, u32::MAX);
        assert!(policy.backoff(5) >= Duration::from_secs(u32::MAX as u64));
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        assert_eq!(RetryPolicy::new(0, 2).attempts(), 1);
    }
}
