//! Version snapshot actions.
//!
//! Versions are an append-only log of full page snapshots. Restoring a
//! version rewrites the page in one transaction; the backup taken before and
//! the version recorded after are advisory and only produce warnings.

use chrono::{TimeDelta, Utc};
use pagebuilder_core::access::{require_page_admin, AccessContext};
use pagebuilder_core::error::CoreError;
use pagebuilder_core::page::{
    validate_id, validate_retention_days, ADMIN_PAGES_PATH, DEFAULT_RETENTION_DAYS,
};
use pagebuilder_core::snapshot::PageSnapshot;
use pagebuilder_core::types::DbId;
use pagebuilder_core::version_diff::compare_snapshots;
use pagebuilder_db::models::page_version::{
    CleanupResult, CleanupVersions, CreatePageVersion, PageVersion, PageVersionDetail,
    RestoreOutcome, VersionComparisonResult,
};
use pagebuilder_db::repositories::{ContentBlockRepo, PageLayoutRepo, PageVersionRepo};

use super::require_layout;
use crate::error::{AppError, AppResult};
use crate::response::ActionResponse;
use crate::state::AppState;

pub const WARN_BACKUP_FAILED: &str =
    "Backup of the current page state could not be created before restoring";
pub const WARN_FORWARD_VERSION_FAILED: &str =
    "Page was restored but the restored state could not be recorded as a new version";

/// Read a page's current layout, blocks and translations into a snapshot.
pub(crate) async fn capture_snapshot(
    state: &AppState,
    layout_id: DbId,
    modified_by: Option<DbId>,
) -> AppResult<PageSnapshot> {
    let layout = require_layout(state, layout_id).await?;
    let blocks = ContentBlockRepo::list_with_translations(&state.pool, layout_id).await?;
    Ok(PageSnapshot::capture(
        layout.into(),
        blocks,
        modified_by,
        Utc::now(),
    ))
}

/// Snapshot the page and append it as the next version.
///
/// Nothing is written if the page cannot be read.
pub(crate) async fn record_version(
    state: &AppState,
    layout_id: DbId,
    is_published: bool,
    created_by: Option<DbId>,
) -> AppResult<PageVersion> {
    let snapshot = capture_snapshot(state, layout_id, created_by).await?;
    let raw = snapshot.to_json()?;
    let version =
        PageVersionRepo::create(&state.pool, layout_id, &raw, is_published, created_by).await?;
    tracing::debug!(
        layout_id,
        version_number = version.version_number,
        blocks = snapshot.blocks.len(),
        "Page version recorded",
    );
    Ok(version)
}

async fn require_version(state: &AppState, id: DbId) -> AppResult<PageVersion> {
    PageVersionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Version", id }.into())
}

/// Record the page's current state as a new version.
pub async fn create_page_version(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
    input: CreatePageVersion,
) -> ActionResponse<PageVersion> {
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        let version = record_version(state, layout_id, input.is_published, access.staff_id).await?;
        tracing::info!(
            layout_id,
            version_number = version.version_number,
            staff_id = ?access.staff_id,
            "Page version created",
        );
        state.revalidation.revalidate(layout_id, ADMIN_PAGES_PATH);
        Ok::<_, AppError>(version)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Versions of a page, newest first, without their snapshots.
pub async fn get_page_versions(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
) -> ActionResponse<Vec<PageVersion>> {
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        require_layout(state, layout_id).await?;
        Ok::<_, AppError>(PageVersionRepo::list_by_layout(&state.pool, layout_id).await?)
    }
    .await;
    ActionResponse::from_result(result)
}

/// One version with its decoded snapshot.
pub async fn get_page_version(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<PageVersionDetail> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "version")?;
        let version = require_version(state, id).await?;
        Ok::<_, AppError>(version.into_detail()?)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Replace a page's state with the one captured in a version.
///
/// A corrupt snapshot aborts before anything is written. The current state
/// is saved as a backup version first and the restored state is recorded as
/// a new version afterwards; failures of either only add a warning.
pub async fn restore_page_version(
    state: &AppState,
    access: &AccessContext,
    version_id: DbId,
) -> ActionResponse<RestoreOutcome> {
    let mut warnings = Vec::new();
    let result = async {
        require_page_admin(access)?;
        validate_id(version_id, "version")?;
        let version = require_version(state, version_id).await?;
        let snapshot = version.parse_snapshot()?;
        let layout_id = version.layout_id;

        let backup_version = match record_version(state, layout_id, false, access.staff_id).await {
            Ok(backup) => Some(backup.version_number),
            Err(e) => {
                tracing::warn!(layout_id, error = %e, "Pre-restore backup failed");
                warnings.push(WARN_BACKUP_FAILED.to_string());
                None
            }
        };

        let layout = PageLayoutRepo::restore_snapshot(&state.pool, layout_id, &snapshot)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Page",
                id: layout_id,
            })?;

        let new_version = match record_version(state, layout_id, false, access.staff_id).await {
            Ok(forward) => Some(forward.version_number),
            Err(e) => {
                tracing::warn!(layout_id, error = %e, "Post-restore version failed");
                warnings.push(WARN_FORWARD_VERSION_FAILED.to_string());
                None
            }
        };

        tracing::info!(
            layout_id,
            restored_version = version.version_number,
            staff_id = ?access.staff_id,
            "Page restored from version",
        );
        state.revalidate_pages(layout_id, &[&layout.route]);
        Ok::<_, AppError>(RestoreOutcome {
            layout,
            restored_version: version.version_number,
            backup_version,
            new_version,
        })
    }
    .await;
    ActionResponse::from_result(result).with_warnings(warnings)
}

/// Differences going from version `v1` to version `v2` of the same page.
pub async fn compare_page_versions(
    state: &AppState,
    access: &AccessContext,
    v1: DbId,
    v2: DbId,
) -> ActionResponse<VersionComparisonResult> {
    let result = async {
        require_page_admin(access)?;
        validate_id(v1, "version")?;
        validate_id(v2, "version")?;
        let from = require_version(state, v1).await?;
        let to = require_version(state, v2).await?;
        if from.layout_id != to.layout_id {
            return Err(CoreError::Integrity(
                "Cannot compare versions of different pages".into(),
            )
            .into());
        }

        let changes = compare_snapshots(&from.parse_snapshot()?, &to.parse_snapshot()?);
        Ok::<_, AppError>(VersionComparisonResult {
            layout_id: from.layout_id,
            from_version: from.version_number,
            to_version: to.version_number,
            has_changes: changes.has_changes(),
            changes,
        })
    }
    .await;
    ActionResponse::from_result(result)
}

/// Delete unpublished versions of a page older than the retention period
/// (30 days unless given). Published versions are always kept.
pub async fn cleanup_old_page_versions(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
    input: CleanupVersions,
) -> ActionResponse<CleanupResult> {
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        let retention_days = input.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS);
        validate_retention_days(retention_days)?;
        require_layout(state, layout_id).await?;

        let deleted_count = purge_before(state, layout_id, retention_days).await?;
        tracing::info!(layout_id, retention_days, deleted_count, "Old page versions removed");
        if deleted_count > 0 {
            state.revalidation.revalidate(layout_id, ADMIN_PAGES_PATH);
        }
        Ok::<_, AppError>(CleanupResult {
            layout_id,
            retention_days,
            deleted_count,
        })
    }
    .await;
    ActionResponse::from_result(result)
}

async fn purge_before(state: &AppState, layout_id: DbId, retention_days: i64) -> AppResult<u64> {
    let cutoff = TimeDelta::try_days(retention_days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| CoreError::Validation("Retention period is too long".into()))?;
    Ok(PageVersionRepo::delete_unpublished_before(&state.pool, layout_id, cutoff).await?)
}

/// Delete one unpublished version.
pub async fn delete_page_version(
    state: &AppState,
    access: &AccessContext,
    version_id: DbId,
) -> ActionResponse<()> {
    let result = async {
        require_page_admin(access)?;
        validate_id(version_id, "version")?;
        let version = require_version(state, version_id).await?;
        if version.is_published {
            return Err(CoreError::Integrity("Cannot delete a published version".into()).into());
        }
        if !PageVersionRepo::delete_unpublished(&state.pool, version_id).await? {
            return Err(CoreError::NotFound {
                entity: "Version",
                id: version_id,
            }
            .into());
        }
        tracing::info!(
            layout_id = version.layout_id,
            version_number = version.version_number,
            "Page version deleted",
        );
        state
            .revalidation
            .revalidate(version.layout_id, ADMIN_PAGES_PATH);
        Ok::<_, AppError>(())
    }
    .await;
    ActionResponse::from_result(result)
}
