//! Job registry and timer loop.
//!
//! Each registered job gets its own task and interval timer. A job never overlaps
//! itself: ticks or manual runs that find it busy are skipped.

use chrono::{NaiveDateTime, Utc};
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::SyncError;
use crate::jobs::retry::{run_with_retry, JobOutcome, RetryPolicy};
use crate::services::sync_log;

pub type RoutineFuture = BoxFuture<'static, Result<u64, SyncError>>;

/// A sync routine; returns the number of records written.
pub type Routine = Arc<dyn Fn() -> RoutineFuture + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
}

/// Point-in-time view of one job.
#[derive(Debug, Clone)]
pub struct JobStatus {
    pub name: String,
    pub interval: Duration,
    pub state: JobState,
    pub last_outcome: Option<JobOutcome>,
    pub last_run_at: Option<NaiveDateTime>,
}

struct SyncJob {
    source: String,
    task_type: String,
    interval: Duration,
    routine: Routine,
    guard: tokio::sync::Mutex<()>,
    status: Mutex<JobStatus>,
}

impl SyncJob {
    fn name(&self) -> String {
        format!("{}.{}", self.source, self.task_type)
    }

    /// Run once through the retry envelope. `None` when a run is already in progress.
    async fn run_guarded(&self, db: &DatabaseConnection, policy: &RetryPolicy) -> Option<JobOutcome> {
        let Ok(_running) = self.guard.try_lock() else {
            tracing::warn!("[{}] Previous run still in progress, skipping", self.name());
            return None;
        };

        self.status.lock().state = JobState::Running;

        let outcome = run_with_retry(db, &self.source, &self.task_type, policy, || {
            (self.routine)()
        })
        .await;

        let mut status = self.status.lock();
        status.state = JobState::Idle;
        status.last_outcome = Some(outcome.clone());
        status.last_run_at = Some(Utc::now().naive_utc());

        Some(outcome)
    }
}

pub struct Scheduler {
    db: DatabaseConnection,
    policy: RetryPolicy,
    jobs: Vec<Arc<SyncJob>>,
    shutdown: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(db: DatabaseConnection, policy: RetryPolicy) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            db,
            policy,
            jobs: Vec::new(),
            shutdown,
            handles: Vec::new(),
        }
    }

    /// Add a job named `source.task_type`. Names must be unique and intervals non-zero.
    pub fn register(
        &mut self,
        source: &str,
        task_type: &str,
        interval: Duration,
        routine: Routine,
    ) -> Result<(), SyncError> {
        let name = format!("{}.{}", source, task_type);

        if interval.is_zero() {
            return Err(SyncError::Job(format!("{} has a zero interval", name)));
        }
        if self.jobs.iter().any(|job| job.name() == name) {
            return Err(SyncError::Job(format!("{} is already registered", name)));
        }

        tracing::debug!("Registered {} every {:?}", name, interval);
        self.jobs.push(Arc::new(SyncJob {
            source: source.to_string(),
            task_type: task_type.to_string(),
            interval,
            routine,
            guard: tokio::sync::Mutex::new(()),
            status: Mutex::new(JobStatus {
                name,
                interval,
                state: JobState::Idle,
                last_outcome: None,
                last_run_at: None,
            }),
        }));
        Ok(())
    }

    /// Arm every job's timer. The first run of a job that succeeded recently is held back
    /// until its interval has elapsed. Does nothing while the timers are already armed.
    pub async fn start(&mut self) {
        if !self.handles.is_empty() {
            tracing::warn!("Scheduler already started");
            return;
        }
        self.shutdown.send_replace(false);

        for job in &self.jobs {
            let delay = match sync_log::initial_delay(&self.db, &job.source, &job.task_type, job.interval)
                .await
            {
                Ok(delay) => delay,
                Err(e) => {
                    tracing::warn!("[{}] Could not read last sync time: {}", job.name(), e);
                    Duration::ZERO
                }
            };

            let job = job.clone();
            let db = self.db.clone();
            let policy = self.policy.clone();
            let mut shutdown = self.shutdown.subscribe();

            self.handles.push(tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + delay, job.interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    if *shutdown.borrow() {
                        break;
                    }

                    tokio::select! {
                        changed = shutdown.changed() => {
                            if changed.is_err() {
                                break;
                            }
                        }
                        _ = ticker.tick() => {
                            job.run_guarded(&db, &policy).await;
                        }
                    }
                }

                tracing::info!("[{}] Stopped", job.name());
            }));
        }

        tracing::info!("Scheduler started with {} jobs", self.jobs.len());
    }

    /// Disarm all timers. A run already in progress completes normally.
    pub fn stop(&self) {
        tracing::info!("Stopping scheduler");
        self.shutdown.send_replace(true);
    }

    /// Wait for every job task to exit. Call after [`Scheduler::stop`].
    pub async fn wait(&mut self) {
        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("Job task ended abnormally: {}", e);
            }
        }
    }

    /// Run one job immediately. `Ok(None)` when it was already running.
    pub async fn run_now(&self, name: &str) -> Result<Option<JobOutcome>, SyncError> {
        let job = self
            .jobs
            .iter()
            .find(|job| job.name() == name)
            .ok_or_else(|| SyncError::Job(format!("unknown job {}", name)))?;

        Ok(job.run_guarded(&self.db, &self.policy).await)
    }

    pub fn jobs(&self) -> Vec<JobStatus> {
        self.jobs.iter().map(|job| job.status.lock().clone()).collect()
    }
}
