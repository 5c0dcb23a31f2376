//! Error values passed between adapters, routines and the retry envelope.

use reqwest::StatusCode;
use sea_orm::DbErr;

/// Failure of a single upstream call. Not-found is not an error; adapters map it
/// to an empty payload before it gets here.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("rate limited by upstream after cool-down")]
    RateLimited,

    #[error("could not decode upstream payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("upstream rejected request: {0}")]
    Rejected(String),
}

/// Error returned by a sync routine. The envelope turns it into a `retrying`
/// or `failed` log entry and never lets it reach the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Job(String),
}
