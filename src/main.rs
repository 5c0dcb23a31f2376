use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchstats_sync::config::Settings;
use matchstats_sync::jobs::{self, retry::RetryPolicy, scheduler::Scheduler};
use matchstats_sync::SyncContext;

/// Make sure the directory of a file-backed SQLite database exists.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,matchstats_sync=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = Settings::from_env().expect("Invalid configuration");

    // Connect to database
    ensure_sqlite_dir(&settings.database_url).expect("Failed to create database directory");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let ctx = Arc::new(
        SyncContext::from_settings(db.clone(), &settings).expect("Failed to build HTTP clients"),
    );
    tracing::info!(
        "Monitoring leagues: {} ({} calls per {:?})",
        settings.monitored_leagues.join(", "),
        settings.fd_rate_limit,
        settings.fd_rate_window
    );

    let policy = RetryPolicy::new(settings.max_retries, settings.backoff_base);
    let mut scheduler = Scheduler::new(db, policy);
    jobs::register_all(&mut scheduler, &ctx, &settings.intervals)
        .expect("Failed to register sync jobs");
    scheduler.start().await;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, waiting for running jobs...");

    scheduler.stop();
    scheduler.wait().await;
    tracing::info!("All sync jobs stopped");
}
