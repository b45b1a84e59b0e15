//! Page version model.
//!
//! Versions are immutable snapshots; only `is_published` changes after insert.

use pagebuilder_core::error::CoreError;
use pagebuilder_core::snapshot::PageSnapshot;
use pagebuilder_core::version_diff::VersionComparison;
use pagebuilder_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `page_versions` table. `snapshot` is JSON text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PageVersion {
    pub id: DbId,
    pub layout_id: DbId,
    pub version_number: i32,
    /// Raw snapshot text; listings leave it out, see [`PageVersionDetail`].
    #[serde(skip_serializing)]
    pub snapshot: String,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PageVersion {
    pub fn parse_snapshot(&self) -> Result<PageSnapshot, CoreError> {
        PageSnapshot::parse(&self.snapshot)
    }

    /// Pair this row with its decoded snapshot.
    pub fn into_detail(self) -> Result<PageVersionDetail, CoreError> {
        let snapshot = self.parse_snapshot()?;
        Ok(PageVersionDetail {
            id: self.id,
            layout_id: self.layout_id,
            version_number: self.version_number,
            is_published: self.is_published,
            created_by: self.created_by,
            created_at: self.created_at,
            snapshot,
        })
    }
}

/// A version with its snapshot decoded, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct PageVersionDetail {
    pub id: DbId,
    pub layout_id: DbId,
    pub version_number: i32,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub snapshot: PageSnapshot,
}

/// Request body for creating a version manually.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePageVersion {
    #[serde(default)]
    pub is_published: bool,
}

/// Query params for comparing two versions.
#[derive(Debug, Clone, Deserialize)]
pub struct CompareVersions {
    pub v1: DbId,
    pub v2: DbId,
}

/// Request body for the retention cleanup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanupVersions {
    pub retention_days: Option<i64>,
}

/// Result of restoring a page to an earlier version.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    pub layout: crate::models::page_layout::PageLayout,
    pub restored_version: i32,
    /// Version holding the state that was overwritten, if it could be saved.
    pub backup_version: Option<i32>,
    /// Version recording the restored state, if it could be saved.
    pub new_version: Option<i32>,
}

/// Differences between two versions of one page.
#[derive(Debug, Clone, Serialize)]
pub struct VersionComparisonResult {
    pub layout_id: DbId,
    pub from_version: i32,
    pub to_version: i32,
    pub has_changes: bool,
    #[serde(flatten)]
    pub changes: VersionComparison,
}

/// Result of a retention cleanup run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CleanupResult {
    pub layout_id: DbId,
    pub retention_days: i64,
    pub deleted_count: u64,
}
