use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle states written to `sync_logs.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Running,
    Retrying,
    Success,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Running => "running",
            SyncStatus::Retrying => "retrying",
            SyncStatus::Success => "success",
            SyncStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source names used in `sync_logs.source`
pub mod sources {
    pub const FOOTBALL_DATA: &str = "football_data";
    pub const SPORTTERY: &str = "sporttery";
}
