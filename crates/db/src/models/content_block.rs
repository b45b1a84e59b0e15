//! Content block model and DTOs.

use std::collections::BTreeMap;

use pagebuilder_core::snapshot::ContentBlockWithTranslations;
use pagebuilder_core::types::{DbId, JsonMap, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::block_translation::BlockTranslation;

/// A row from the `content_blocks` table. `configuration` is JSON text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContentBlock {
    pub id: DbId,
    pub layout_id: DbId,
    pub block_type: String,
    pub block_key: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub configuration: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContentBlock {
    /// Attach translation rows belonging to this block.
    pub fn with_translations(
        self,
        translations: Vec<BlockTranslation>,
    ) -> ContentBlockWithTranslations {
        ContentBlockWithTranslations {
            id: self.id,
            layout_id: self.layout_id,
            block_type: self.block_type,
            block_key: self.block_key,
            display_order: self.display_order,
            is_visible: self.is_visible,
            configuration: self.configuration,
            created_at: self.created_at,
            updated_at: self.updated_at,
            translations: translations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Locale tag to content object, as sent by the editor.
pub type TranslationMap = BTreeMap<String, JsonMap>;

/// DTO for creating a block on a page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentBlock {
    pub block_type: String,
    pub block_key: String,
    /// Appended after the last block when omitted.
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
    #[serde(default)]
    pub configuration: JsonMap,
    #[serde(default)]
    pub translations: TranslationMap,
}

/// DTO for updating a block.
///
/// A supplied `translations` map replaces every existing translation of the
/// block; locales left out are deleted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContentBlock {
    pub block_key: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
    pub configuration: Option<JsonMap>,
    pub translations: Option<TranslationMap>,
}

/// Column values for a block insert, configuration already encoded.
#[derive(Debug, Clone)]
pub struct NewContentBlock {
    pub layout_id: DbId,
    pub block_type: String,
    pub block_key: String,
    pub display_order: i32,
    pub is_visible: bool,
    pub configuration: String,
}

/// Column changes for a block update, configuration already encoded.
#[derive(Debug, Clone, Default)]
pub struct ContentBlockChanges {
    pub block_key: Option<String>,
    pub display_order: Option<i32>,
    pub is_visible: Option<bool>,
    pub configuration: Option<String>,
}

/// One entry of a reorder request.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BlockOrder {
    pub id: DbId,
    pub display_order: i32,
}
