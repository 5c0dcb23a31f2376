pub mod football_data_sync;
pub mod retry;
pub mod scheduler;
pub mod sporttery_sync;

use futures_util::FutureExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::JobIntervals;
use crate::error::SyncError;
use crate::models::sync_log::sources;
use crate::SyncContext;
use scheduler::{Routine, Scheduler};

/// A routine bound to its log identity and cadence.
pub struct JobDefinition {
    pub source: &'static str,
    pub task_type: &'static str,
    pub interval: Duration,
    pub routine: Routine,
}

fn bind<F, Fut>(ctx: &Arc<SyncContext>, routine: F) -> Routine
where
    F: Fn(Arc<SyncContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<u64, SyncError>> + Send + 'static,
{
    let ctx = ctx.clone();
    Arc::new(move || routine(ctx.clone()).boxed())
}

/// Every sync job the service runs.
pub fn catalogue(ctx: &Arc<SyncContext>, intervals: &JobIntervals) -> Vec<JobDefinition> {
    use football_data_sync as fd;

    let job = |source, task_type, interval, routine| JobDefinition {
        source,
        task_type,
        interval,
        routine,
    };

    vec![
        job(sources::FOOTBALL_DATA, "scheduled", intervals.scheduled, bind(ctx, fd::sync_scheduled)),
        job(sources::FOOTBALL_DATA, "results", intervals.results, bind(ctx, fd::sync_results)),
        job(sources::FOOTBALL_DATA, "standings", intervals.standings, bind(ctx, fd::sync_standings)),
        job(sources::FOOTBALL_DATA, "scorers", intervals.scorers, bind(ctx, fd::sync_scorers)),
        job(sources::FOOTBALL_DATA, "teams", intervals.teams, bind(ctx, fd::sync_teams)),
        job(
            sources::FOOTBALL_DATA,
            "competitions",
            intervals.competitions,
            bind(ctx, fd::sync_competitions),
        ),
        job(
            sources::FOOTBALL_DATA,
            "team_details",
            intervals.team_details,
            bind(ctx, fd::sync_team_details),
        ),
        job(
            sources::FOOTBALL_DATA,
            "match_details",
            intervals.match_details,
            bind(ctx, fd::sync_match_details),
        ),
        job(
            sources::FOOTBALL_DATA,
            "live_scores",
            intervals.live_scores,
            bind(ctx, fd::sync_live_scores),
        ),
        job(
            sources::SPORTTERY,
            "matches",
            intervals.sporttery,
            bind(ctx, sporttery_sync::sync_matches),
        ),
    ]
}

pub fn register_all(
    scheduler: &mut Scheduler,
    ctx: &Arc<SyncContext>,
    intervals: &JobIntervals,
) -> Result<(), SyncError> {
    for job in catalogue(ctx, intervals) {
        scheduler.register(job.source, job.task_type, job.interval, job.routine)?;
    }
    Ok(())
}
