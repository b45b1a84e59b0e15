//! Repository for the `block_translations` table.

use pagebuilder_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::block_translation::{BlockTranslation, NewTranslation};

/// Column list for block_translations queries.
pub(crate) const COLUMNS: &str = "id, block_id, locale, content, created_at, updated_at";

/// Read and write operations for block translations.
pub struct BlockTranslationRepo;

impl BlockTranslationRepo {
    /// All translations of one block, ordered by locale.
    pub async fn list_by_block(
        pool: &PgPool,
        block_id: DbId,
    ) -> Result<Vec<BlockTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM block_translations
             WHERE block_id = $1
             ORDER BY locale ASC"
        );
        sqlx::query_as::<_, BlockTranslation>(&query)
            .bind(block_id)
            .fetch_all(pool)
            .await
    }

    /// Translations of many blocks at once, ordered by block then locale.
    pub async fn list_by_blocks(
        conn: &mut PgConnection,
        block_ids: &[DbId],
    ) -> Result<Vec<BlockTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM block_translations
             WHERE block_id = ANY($1)
             ORDER BY block_id ASC, locale ASC"
        );
        sqlx::query_as::<_, BlockTranslation>(&query)
            .bind(block_ids)
            .fetch_all(conn)
            .await
    }

    /// Find one locale of a block.
    pub async fn find(
        pool: &PgPool,
        block_id: DbId,
        locale: &str,
    ) -> Result<Option<BlockTranslation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM block_translations
             WHERE block_id = $1 AND locale = $2"
        );
        sqlx::query_as::<_, BlockTranslation>(&query)
            .bind(block_id)
            .bind(locale)
            .fetch_optional(pool)
            .await
    }

    /// Insert a batch of translations for a block on an open connection.
    pub(crate) async fn insert_many(
        conn: &mut PgConnection,
        block_id: DbId,
        translations: &[NewTranslation],
    ) -> Result<(), sqlx::Error> {
        for t in translations {
            sqlx::query(
                "INSERT INTO block_translations (block_id, locale, content) VALUES ($1, $2, $3)",
            )
            .bind(block_id)
            .bind(&t.locale)
            .bind(&t.content)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Delete every translation of a block, then insert the supplied set.
    pub(crate) async fn replace_all(
        conn: &mut PgConnection,
        block_id: DbId,
        translations: &[NewTranslation],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM block_translations WHERE block_id = $1")
            .bind(block_id)
            .execute(&mut *conn)
            .await?;
        Self::insert_many(conn, block_id, translations).await
    }
}
