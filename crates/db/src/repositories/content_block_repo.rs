//! Repository for the `content_blocks` table.
//!
//! Blocks are written together with their translations in one transaction.
//! Translations disappear with their block through `ON DELETE CASCADE`.

use std::collections::HashMap;

use pagebuilder_core::snapshot::ContentBlockWithTranslations;
use pagebuilder_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::block_translation::{BlockTranslation, NewTranslation};
use crate::models::content_block::{BlockOrder, ContentBlock, ContentBlockChanges, NewContentBlock};
use crate::repositories::block_translation_repo::BlockTranslationRepo;

/// Column list for content_blocks queries.
pub(crate) const COLUMNS: &str = "id, layout_id, block_type, block_key, display_order, \
    is_visible, configuration, created_at, updated_at";

/// CRUD, ordering and lookup operations for content blocks.
pub struct ContentBlockRepo;

impl ContentBlockRepo {
    /// Insert a block and its translations atomically.
    pub async fn create(
        pool: &PgPool,
        block: &NewContentBlock,
        translations: &[NewTranslation],
    ) -> Result<ContentBlock, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let created = Self::insert(&mut tx, block).await?;
        BlockTranslationRepo::insert_many(&mut tx, created.id, translations).await?;
        tx.commit().await?;
        Ok(created)
    }

    /// Find a block by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContentBlock>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM content_blocks WHERE id = $1");
        sqlx::query_as::<_, ContentBlock>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a block by ID together with its translations.
    pub async fn find_with_translations(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentBlockWithTranslations>, sqlx::Error> {
        let Some(block) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let translations = BlockTranslationRepo::list_by_block(pool, block.id).await?;
        Ok(Some(block.with_translations(translations)))
    }

    /// All blocks of a layout in render order.
    pub async fn list_by_layout(
        pool: &PgPool,
        layout_id: DbId,
    ) -> Result<Vec<ContentBlock>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_blocks
             WHERE layout_id = $1
             ORDER BY display_order ASC, id ASC"
        );
        sqlx::query_as::<_, ContentBlock>(&query)
            .bind(layout_id)
            .fetch_all(pool)
            .await
    }

    /// All blocks of a layout in render order, each with its translations.
    ///
    /// Both reads run on one connection so a concurrent write cannot be
    /// observed halfway.
    pub async fn list_with_translations(
        pool: &PgPool,
        layout_id: DbId,
    ) -> Result<Vec<ContentBlockWithTranslations>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let blocks = Self::list_with_translations_on(&mut tx, layout_id).await?;
        tx.commit().await?;
        Ok(blocks)
    }

    /// Whether `block_key` is taken on the layout, optionally ignoring one block.
    pub async fn key_exists(
        pool: &PgPool,
        layout_id: DbId,
        block_key: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM content_blocks
                WHERE layout_id = $1 AND block_key = $2
                  AND ($3::BIGINT IS NULL OR id <> $3)
            )",
        )
        .bind(layout_id)
        .bind(block_key)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Number of blocks of one type on a layout.
    pub async fn count_by_type(
        pool: &PgPool,
        layout_id: DbId,
        block_type: &str,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM content_blocks WHERE layout_id = $1 AND block_type = $2",
        )
        .bind(layout_id)
        .bind(block_type)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Highest display order on a layout, `None` when it has no blocks.
    pub async fn max_display_order(
        pool: &PgPool,
        layout_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let (max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(display_order) FROM content_blocks WHERE layout_id = $1")
                .bind(layout_id)
                .fetch_one(pool)
                .await?;
        Ok(max)
    }

    /// IDs of every block on a layout.
    pub async fn ids_for_layout(pool: &PgPool, layout_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> =
            sqlx::query_as("SELECT id FROM content_blocks WHERE layout_id = $1")
                .bind(layout_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Apply column changes and, when given, replace all translations.
    ///
    /// Returns `None` if the block does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &ContentBlockChanges,
        translations: Option<&[NewTranslation]>,
    ) -> Result<Option<ContentBlock>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let query = format!(
            "UPDATE content_blocks SET
                block_key = COALESCE($2, block_key),
                display_order = COALESCE($3, display_order),
                is_visible = COALESCE($4, is_visible),
                configuration = COALESCE($5, configuration)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ContentBlock>(&query)
            .bind(id)
            .bind(&changes.block_key)
            .bind(changes.display_order)
            .bind(changes.is_visible)
            .bind(&changes.configuration)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(block) = updated else {
            return Ok(None);
        };
        if let Some(translations) = translations {
            BlockTranslationRepo::replace_all(&mut tx, block.id, translations).await?;
        }
        tx.commit().await?;
        Ok(Some(block))
    }

    /// Flip `is_visible`. Returns `None` if the block does not exist.
    pub async fn toggle_visibility(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ContentBlock>, sqlx::Error> {
        let query = format!(
            "UPDATE content_blocks SET is_visible = NOT is_visible
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentBlock>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a block. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM content_blocks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the display order of several blocks of one layout atomically.
    ///
    /// Callers check ownership first; rows of other layouts are never touched.
    pub async fn reorder(
        pool: &PgPool,
        layout_id: DbId,
        orders: &[BlockOrder],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for order in orders {
            sqlx::query(
                "UPDATE content_blocks SET display_order = $1 WHERE id = $2 AND layout_id = $3",
            )
            .bind(order.display_order)
            .bind(order.id)
            .bind(layout_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Connection-level helpers shared with other repositories
    // -----------------------------------------------------------------------

    pub(crate) async fn insert(
        conn: &mut PgConnection,
        block: &NewContentBlock,
    ) -> Result<ContentBlock, sqlx::Error> {
        let query = format!(
            "INSERT INTO content_blocks
                (layout_id, block_type, block_key, display_order, is_visible, configuration)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContentBlock>(&query)
            .bind(block.layout_id)
            .bind(&block.block_type)
            .bind(&block.block_key)
            .bind(block.display_order)
            .bind(block.is_visible)
            .bind(&block.configuration)
            .fetch_one(conn)
            .await
    }

    pub(crate) async fn list_with_translations_on(
        conn: &mut PgConnection,
        layout_id: DbId,
    ) -> Result<Vec<ContentBlockWithTranslations>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM content_blocks
             WHERE layout_id = $1
             ORDER BY display_order ASC, id ASC"
        );
        let blocks = sqlx::query_as::<_, ContentBlock>(&query)
            .bind(layout_id)
            .fetch_all(&mut *conn)
            .await?;

        let ids: Vec<DbId> = blocks.iter().map(|b| b.id).collect();
        let mut by_block: HashMap<DbId, Vec<BlockTranslation>> = HashMap::new();
        for t in BlockTranslationRepo::list_by_blocks(conn, &ids).await? {
            by_block.entry(t.block_id).or_default().push(t);
        }

        Ok(blocks
            .into_iter()
            .map(|block| {
                let own = by_block.remove(&block.id).unwrap_or_default();
                block.with_translations(own)
            })
            .collect())
    }
}
