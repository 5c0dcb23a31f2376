use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchstats_sync::config::Settings;
use matchstats_sync::jobs::{self, retry::RetryPolicy, scheduler::Scheduler};
use matchstats_sync::SyncContext;

const LIVE_ONLY: &[&str] = &["football_data.live_scores"];
const RESULTS: &[&str] = &["football_data.results", "football_data.match_details"];

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin sync_now [live_only|results|full]");
    eprintln!("Example: cargo run --bin sync_now results");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
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

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("full");
    if !matches!(mode, "live_only" | "results" | "full") {
        usage();
    }

    let settings = Settings::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&settings.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let ctx = Arc::new(SyncContext::from_settings(db.clone(), &settings)?);
    let policy = RetryPolicy::new(settings.max_retries, settings.backoff_base);
    let mut scheduler = Scheduler::new(db, policy);
    jobs::register_all(&mut scheduler, &ctx, &settings.intervals)?;

    let selected: Vec<String> = match mode {
        "live_only" => LIVE_ONLY.iter().map(|s| s.to_string()).collect(),
        "results" => RESULTS.iter().map(|s| s.to_string()).collect(),
        _ => scheduler.jobs().into_iter().map(|job| job.name).collect(),
    };

    tracing::info!("Running {} sync ({} jobs)", mode, selected.len());

    let mut failed = 0;
    for name in &selected {
        match scheduler.run_now(name).await? {
            Some(outcome) if outcome.is_success() => {}
            Some(_) => failed += 1,
            None => tracing::warn!("{} skipped", name),
        }
    }

    tracing::info!("{} sync finished: {} of {} jobs failed", mode, failed, selected.len());
    if failed > 0 {
        std::process::exit(2);
    }
    Ok(())
}
