//! Page snapshot value types.
//!
//! A [`PageSnapshot`] captures a layout, all of its blocks and all of their
//! translations. It is stored as JSON text in `page_versions.snapshot` and is
//! self-contained: restoring a page needs nothing else.
//!
//! Block `configuration` and translation `content` are kept as the exact JSON
//! strings read from storage so a restore writes back identical bytes.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, JsonMap, Timestamp};

/// Layout row as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayoutData {
    pub id: DbId,
    pub name: String,
    pub page_type: String,
    pub route: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Translation row as captured in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTranslationData {
    pub id: DbId,
    pub block_id: DbId,
    pub locale: String,
    /// JSON-encoded content object, verbatim from storage.
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A content block together with all of its translations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlockWithTranslations {
    pub id: DbId,
    pub layout_id: DbId,
    pub block_type: String,
    pub block_key: String,
    pub display_order: i32,
    pub is_visible: bool,
    /// JSON-encoded configuration object, verbatim from storage.
    pub configuration: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub translations: Vec<BlockTranslationData>,
}

impl ContentBlockWithTranslations {
    pub fn translation(&self, locale: &str) -> Option<&BlockTranslationData> {
        self.translations.iter().find(|t| t.locale == locale)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub total_blocks: usize,
    pub last_modified: Timestamp,
    pub modified_by: Option<DbId>,
}

/// Full, self-contained state of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub layout: PageLayoutData,
    pub blocks: Vec<ContentBlockWithTranslations>,
    pub metadata: SnapshotMetadata,
}

impl PageSnapshot {
    /// Assemble a snapshot, deriving the metadata block.
    pub fn capture(
        layout: PageLayoutData,
        blocks: Vec<ContentBlockWithTranslations>,
        modified_by: Option<DbId>,
        captured_at: Timestamp,
    ) -> Self {
        let metadata = SnapshotMetadata {
            total_blocks: blocks.len(),
            last_modified: captured_at,
            modified_by,
        };
        Self {
            layout,
            blocks,
            metadata,
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize page snapshot: {e}")))
    }

    /// Parse stored snapshot text. Malformed text is an integrity error.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw)
            .map_err(|e| CoreError::Integrity(format!("Stored page snapshot is corrupt: {e}")))
    }

    pub fn block(&self, block_key: &str) -> Option<&ContentBlockWithTranslations> {
        self.blocks.iter().find(|b| b.block_key == block_key)
    }
}

/// Encode a JSON object the way it is stored in text columns.
pub fn encode_json(map: &JsonMap) -> String {
    serde_json::Value::Object(map.clone()).to_string()
}

/// Decode a stored JSON object, treating anything unparseable or non-object
/// as an empty map.
pub fn decode_json_lossy(raw: &str) -> JsonMap {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => JsonMap::new(),
    }
}
