//! Periodic cleanup of old page versions.
//!
//! Deletes unpublished versions older than the configured retention period
//! from every page. Published versions are never touched.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use pagebuilder_db::repositories::{PageLayoutRepo, PageVersionRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Run one sweep over all pages. Returns the number of versions removed.
///
/// A failure on one page is logged and the sweep moves on.
pub async fn sweep(pool: &PgPool, retention_days: i64) -> Result<u64, sqlx::Error> {
    let Some(cutoff) =
        TimeDelta::try_days(retention_days).and_then(|window| Utc::now().checked_sub_signed(window))
    else {
        tracing::warn!(retention_days, "Version retention: period out of range, skipping");
        return Ok(0);
    };
    let mut deleted = 0;
    for layout_id in PageLayoutRepo::list_ids(pool).await? {
        match PageVersionRepo::delete_unpublished_before(pool, layout_id, cutoff).await {
            Ok(n) => deleted += n,
            Err(e) => {
                tracing::error!(layout_id, error = %e, "Version retention: page cleanup failed");
            }
        }
    }
    Ok(deleted)
}

/// Run the version retention loop until `cancel` is triggered.
pub async fn run(
    pool: PgPool,
    retention_days: i64,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_days,
        interval_secs = every.as_secs(),
        "Version retention job started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Version retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, retention_days).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Version retention: purged old versions");
                    }
                    Ok(_) => tracing::debug!("Version retention: nothing to purge"),
                    Err(e) => {
                        tracing::error!(error = %e, "Version retention: sweep failed");
                    }
                }
            }
        }
    }
}
