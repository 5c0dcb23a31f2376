#![allow(dead_code)]

use axum::Router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;

use matchstats_sync::services::football_data::FootballDataService;
use matchstats_sync::services::football_data_store::FootballDataStore;
use matchstats_sync::services::rate_limiter::RateLimiter;
use matchstats_sync::services::sporttery::SportteryService;
use matchstats_sync::services::sporttery_store::SportteryStore;
use matchstats_sync::SyncContext;

/// Set up a migrated in-memory SQLite database.
/// A single pooled connection keeps the in-memory database alive for the whole test.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub const TEST_TOKEN: &str = "test-token";

pub fn football_data_service(base_url: &str, limiter: Arc<RateLimiter>) -> FootballDataService {
    FootballDataService::new(
        TEST_TOKEN.to_string(),
        base_url.to_string(),
        limiter,
        Duration::from_millis(50),
    )
    .unwrap()
}

pub fn test_context(
    db: DatabaseConnection,
    fd_base_url: &str,
    sporttery_base_url: &str,
    leagues: &[&str],
) -> Arc<SyncContext> {
    let limiter = Arc::new(RateLimiter::new(100, Duration::from_secs(60)));
    Arc::new(SyncContext {
        football_data: football_data_service(fd_base_url, limiter),
        sporttery: SportteryService::new(sporttery_base_url.to_string(), Duration::from_secs(2))
            .unwrap(),
        fd_store: FootballDataStore::new(db.clone()),
        sporttery_store: SportteryStore::new(db.clone()),
        monitored_leagues: leagues.iter().map(|l| l.to_string()).collect(),
        db,
    })
}
