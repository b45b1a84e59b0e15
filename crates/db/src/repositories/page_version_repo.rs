//! Repository for the `page_versions` table.
//!
//! Versions form an append-only log per layout. Version numbers come from
//! `page_version_counters`, bumped in the same statement as the insert; the
//! counter row lock serializes concurrent appends and deleted numbers are
//! never reissued.

use pagebuilder_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::page_version::PageVersion;

/// Column list for page_versions queries.
const COLUMNS: &str = "id, layout_id, version_number, snapshot, is_published, \
    created_by, created_at, updated_at";

/// Append, read and retention operations for page versions.
pub struct PageVersionRepo;

impl PageVersionRepo {
    /// Append a version holding `snapshot` with the next version number.
    pub async fn create(
        pool: &PgPool,
        layout_id: DbId,
        snapshot: &str,
        is_published: bool,
        created_by: Option<DbId>,
    ) -> Result<PageVersion, sqlx::Error> {
        let query = format!(
            "WITH counter AS (
                INSERT INTO page_version_counters (layout_id, last_version_number)
                VALUES ($1, 1)
                ON CONFLICT (layout_id) DO UPDATE
                    SET last_version_number = page_version_counters.last_version_number + 1
                RETURNING last_version_number
             )
             INSERT INTO page_versions
                (layout_id, version_number, snapshot, is_published, created_by)
             SELECT $1, counter.last_version_number, $2, $3, $4 FROM counter
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(layout_id)
            .bind(snapshot)
            .bind(is_published)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a version by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_versions WHERE id = $1");
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All versions of a layout, newest first.
    pub async fn list_by_layout(
        pool: &PgPool,
        layout_id: DbId,
    ) -> Result<Vec<PageVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_versions
             WHERE layout_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(layout_id)
            .fetch_all(pool)
            .await
    }

    /// Highest version number still stored for a layout, 0 when it has none.
    pub async fn latest_version_number(pool: &PgPool, layout_id: DbId) -> Result<i32, sqlx::Error> {
        let (latest,): (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(version_number), 0) FROM page_versions WHERE layout_id = $1",
        )
        .bind(layout_id)
        .fetch_one(pool)
        .await?;
        Ok(latest)
    }

    /// Delete a version unless it is published.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_unpublished(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_versions WHERE id = $1 AND is_published = false")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete unpublished versions of a layout created before `cutoff`.
    ///
    /// Returns the number of rows removed.
    pub async fn delete_unpublished_before(
        pool: &PgPool,
        layout_id: DbId,
        cutoff: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM page_versions
             WHERE layout_id = $1 AND is_published = false AND created_at < $2",
        )
        .bind(layout_id)
        .bind(cutoff)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
