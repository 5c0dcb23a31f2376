//! Append-only sync log.
//!
//! Every step of a job's retry envelope adds a row (running, retrying, success, failed).
//! The log also paces startup so a restart does not immediately repeat a job that ran
//! successfully within its interval.

use chrono::{NaiveDateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::time::Duration;

use crate::entities::prelude::SyncLogs;
use crate::entities::sync_logs;
use crate::models::sync_log::SyncStatus;

/// Append a log row and return its id.
pub async fn log_sync(
    db: &DatabaseConnection,
    source: &str,
    task_type: &str,
    status: SyncStatus,
    records_count: Option<i64>,
    error_message: Option<&str>,
    retry_count: Option<i32>,
) -> Result<i32, DbErr> {
    let entry = sync_logs::ActiveModel {
        source: Set(source.to_string()),
        task_type: Set(task_type.to_string()),
        status: Set(status.as_str().to_string()),
        records_count: Set(records_count.unwrap_or(0)),
        error_message: Set(error_message.map(str::to_string)),
        started_at: Set(Utc::now().naive_utc()),
        finished_at: Set(None),
        retry_count: Set(retry_count.unwrap_or(0)),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("[{}.{}] Logged {} (entry {})", source, task_type, status, entry.id);
    Ok(entry.id)
}

/// Stamp the finish time on `id`. Returns false when it was already stamped or is unknown.
pub async fn update_log_finish(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = SyncLogs::update_many()
        .col_expr(
            sync_logs::Column::FinishedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .filter(sync_logs::Column::Id.eq(id))
        .filter(sync_logs::Column::FinishedAt.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Most recent entries first.
pub async fn get_logs(
    db: &DatabaseConnection,
    source: Option<&str>,
    limit: u64,
) -> Result<Vec<sync_logs::Model>, DbErr> {
    let mut query = SyncLogs::find();
    if let Some(source) = source {
        query = query.filter(sync_logs::Column::Source.eq(source));
    }

    query
        .order_by_desc(sync_logs::Column::StartedAt)
        .order_by_desc(sync_logs::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

/// Start time of the most recent successful entry for `source`.
pub async fn get_last_sync_time(
    db: &DatabaseConnection,
    source: &str,
) -> Result<Option<NaiveDateTime>, DbErr> {
    last_success(db, source, None).await
}

pub async fn last_success_for_task(
    db: &DatabaseConnection,
    source: &str,
    task_type: &str,
) -> Result<Option<NaiveDateTime>, DbErr> {
    last_success(db, source, Some(task_type)).await
}

async fn last_success(
    db: &DatabaseConnection,
    source: &str,
    task_type: Option<&str>,
) -> Result<Option<NaiveDateTime>, DbErr> {
    let mut query = SyncLogs::find()
        .filter(sync_logs::Column::Source.eq(source))
        .filter(sync_logs::Column::Status.eq(SyncStatus::Success.as_str()));
    if let Some(task_type) = task_type {
        query = query.filter(sync_logs::Column::TaskType.eq(task_type));
    }

    let latest = query
        .order_by_desc(sync_logs::Column::StartedAt)
        .order_by_desc(sync_logs::Column::Id)
        .one(db)
        .await?;

    Ok(latest.map(|entry| entry.started_at))
}

/// How long to hold back a job's first run after startup.
///
/// Zero when the job never succeeded or its last success is older than `interval`,
/// otherwise the remainder of the interval.
pub async fn initial_delay(
    db: &DatabaseConnection,
    source: &str,
    task_type: &str,
    interval: Duration,
) -> Result<Duration, DbErr> {
    let Some(last_success) = last_success_for_task(db, source, task_type).await? else {
        tracing::info!("[{}.{}] No previous successful sync, will sync", source, task_type);
        return Ok(Duration::ZERO);
    };

    let elapsed = Utc::now()
        .naive_utc()
        .signed_duration_since(last_success)
        .to_std()
        .unwrap_or(Duration::ZERO);

    if elapsed >= interval {
        tracing::info!(
            "[{}.{}] Last sync was {}s ago (interval: {}s), will sync",
            source,
            task_type,
            elapsed.as_secs(),
            interval.as_secs()
        );
        Ok(Duration::ZERO)
    } else {
        let remaining = interval - elapsed;
        tracing::info!(
            "[{}.{}] Last sync was {}s ago, next sync in {}s",
            source,
            task_type,
            elapsed.as_secs(),
            remaining.as_secs()
        );
        Ok(remaining)
    }
}
