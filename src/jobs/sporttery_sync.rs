use std::sync::Arc;

use crate::error::SyncError;
use crate::SyncContext;

/// Mirror the current sporttery fixture list.
pub async fn sync_matches(ctx: Arc<SyncContext>) -> Result<u64, SyncError> {
    let matches = ctx.sporttery.get_matches().await?;

    let mut count = 0;
    for record in &matches {
        if ctx.sporttery_store.save_match(record).await {
            count += 1;
        }
    }

    if count < matches.len() as u64 {
        tracing::warn!("Saved {} of {} sporttery matches", count, matches.len());
    }
    Ok(count)
}
