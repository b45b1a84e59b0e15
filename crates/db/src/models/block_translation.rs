//! Per-locale block content.

use pagebuilder_core::snapshot::BlockTranslationData;
use pagebuilder_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `block_translations` table. `content` is JSON text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BlockTranslation {
    pub id: DbId,
    pub block_id: DbId,
    pub locale: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BlockTranslation> for BlockTranslationData {
    fn from(row: BlockTranslation) -> Self {
        Self {
            id: row.id,
            block_id: row.block_id,
            locale: row.locale,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// An already-encoded translation ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub locale: String,
    pub content: String,
}
