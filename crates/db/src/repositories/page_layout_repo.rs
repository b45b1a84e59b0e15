//! Repository for the `page_layouts` table.
//!
//! Also hosts the two whole-page transactions: duplicating a page with all
//! of its blocks, and replacing a page's state from a snapshot.

use pagebuilder_core::snapshot::PageSnapshot;
use pagebuilder_core::types::DbId;
use sqlx::PgPool;

use crate::models::block_translation::NewTranslation;
use crate::models::content_block::{ContentBlock, NewContentBlock};
use crate::models::page_layout::{CreatePageLayout, PageLayout, UpdatePageLayout};
use crate::repositories::block_translation_repo::BlockTranslationRepo;
use crate::repositories::content_block_repo::{self, ContentBlockRepo};

/// Column list for page_layouts queries.
const COLUMNS: &str = "id, name, page_type, route, title, description, \
    is_active, is_published, created_by, created_at, updated_at";

/// CRUD and whole-page operations for page layouts.
pub struct PageLayoutRepo;

impl PageLayoutRepo {
    /// Insert a new, unpublished layout.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePageLayout,
        created_by: Option<DbId>,
    ) -> Result<PageLayout, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_layouts
                (name, page_type, route, title, description, is_active, is_published, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, false, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(&input.name)
            .bind(&input.page_type)
            .bind(&input.route)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_active.unwrap_or(true))
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a layout by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PageLayout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM page_layouts WHERE id = $1");
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active, published layout served at `route`.
    pub async fn find_published_by_route(
        pool: &PgPool,
        route: &str,
    ) -> Result<Option<PageLayout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_layouts
             WHERE route = $1 AND is_published = true AND is_active = true"
        );
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(route)
            .fetch_optional(pool)
            .await
    }

    /// List all layouts, most recently edited first.
    pub async fn list(pool: &PgPool) -> Result<Vec<PageLayout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_layouts
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, PageLayout>(&query).fetch_all(pool).await
    }

    /// IDs of every layout.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM page_layouts ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Whether `route` is taken, optionally ignoring one layout.
    pub async fn route_exists(
        pool: &PgPool,
        route: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM page_layouts
                WHERE route = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )",
        )
        .bind(route)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Partially update a layout. Returns `None` if it does not exist.
    ///
    /// `title` and `description` are written whenever the outer `Option` is
    /// `Some`, so an inner `None` clears them.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePageLayout,
    ) -> Result<Option<PageLayout>, sqlx::Error> {
        let query = format!(
            "UPDATE page_layouts SET
                name = COALESCE($2, name),
                page_type = COALESCE($3, page_type),
                route = COALESCE($4, route),
                title = CASE WHEN $5 THEN $6 ELSE title END,
                description = CASE WHEN $7 THEN $8 ELSE description END,
                is_active = COALESCE($9, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.page_type)
            .bind(&input.route)
            .bind(input.title.is_some())
            .bind(input.title.as_ref().and_then(|t| t.as_deref()))
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|d| d.as_deref()))
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Mark a layout as published. Returns `None` if it does not exist.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<PageLayout>, sqlx::Error> {
        let query = format!(
            "UPDATE page_layouts SET is_published = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageLayout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a layout with its blocks, translations and versions.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_layouts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deep-copy a layout, its blocks and their translations under a new
    /// route. The copy is unpublished and has no version history.
    pub async fn duplicate(
        pool: &PgPool,
        source: &PageLayout,
        new_route: &str,
        new_name: &str,
        created_by: Option<DbId>,
    ) -> Result<PageLayout, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO page_layouts
                (name, page_type, route, title, description, is_active, is_published, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, false, $7)
             RETURNING {COLUMNS}"
        );
        let copy = sqlx::query_as::<_, PageLayout>(&query)
            .bind(new_name)
            .bind(&source.page_type)
            .bind(new_route)
            .bind(&source.title)
            .bind(&source.description)
            .bind(source.is_active)
            .bind(created_by)
            .fetch_one(&mut *tx)
            .await?;

        let block_query = format!(
            "SELECT {} FROM content_blocks
             WHERE layout_id = $1
             ORDER BY display_order ASC, id ASC",
            content_block_repo::COLUMNS
        );
        let blocks = sqlx::query_as::<_, ContentBlock>(&block_query)
            .bind(source.id)
            .fetch_all(&mut *tx)
            .await?;

        for block in blocks {
            let inserted = ContentBlockRepo::insert(
                &mut tx,
                &NewContentBlock {
                    layout_id: copy.id,
                    block_type: block.block_type,
                    block_key: block.block_key,
                    display_order: block.display_order,
                    is_visible: block.is_visible,
                    configuration: block.configuration,
                },
            )
            .await?;

            sqlx::query(
                "INSERT INTO block_translations (block_id, locale, content)
                 SELECT $1, locale, content FROM block_translations WHERE block_id = $2",
            )
            .bind(inserted.id)
            .bind(block.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(copy)
    }

    /// Replace a layout's state with the one captured in `snapshot`.
    ///
    /// Overwrites name, page type, title, description and active flag, then
    /// deletes every current block (translations cascade) and re-inserts the
    /// captured blocks and translations verbatim. Route and publish state are
    /// left as they are. Returns `None` if the layout does not exist.
    pub async fn restore_snapshot(
        pool: &PgPool,
        layout_id: DbId,
        snapshot: &PageSnapshot,
    ) -> Result<Option<PageLayout>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let captured = &snapshot.layout;

        let query = format!(
            "UPDATE page_layouts SET
                name = $2,
                page_type = $3,
                title = $4,
                description = $5,
                is_active = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let layout = sqlx::query_as::<_, PageLayout>(&query)
            .bind(layout_id)
            .bind(&captured.name)
            .bind(&captured.page_type)
            .bind(&captured.title)
            .bind(&captured.description)
            .bind(captured.is_active)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(layout) = layout else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM content_blocks WHERE layout_id = $1")
            .bind(layout_id)
            .execute(&mut *tx)
            .await?;

        for block in &snapshot.blocks {
            let inserted = ContentBlockRepo::insert(
                &mut tx,
                &NewContentBlock {
                    layout_id,
                    block_type: block.block_type.clone(),
                    block_key: block.block_key.clone(),
                    display_order: block.display_order,
                    is_visible: block.is_visible,
                    configuration: block.configuration.clone(),
                },
            )
            .await?;

            let translations: Vec<NewTranslation> = block
                .translations
                .iter()
                .map(|t| NewTranslation {
                    locale: t.locale.clone(),
                    content: t.content.clone(),
                })
                .collect();
            BlockTranslationRepo::insert_many(&mut tx, inserted.id, &translations).await?;
        }

        tx.commit().await?;
        tracing::debug!(
            layout_id,
            blocks = snapshot.blocks.len(),
            "Page state replaced from snapshot"
        );
        Ok(Some(layout))
    }
}
