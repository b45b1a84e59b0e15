//! Content block actions.
//!
//! Every write path runs the block validator over each supplied locale's
//! content before touching storage.

use pagebuilder_core::access::{require_page_admin, AccessContext};
use pagebuilder_core::block_registry::BlockRegistry;
use pagebuilder_core::block_validation::{validate_block, validate_configuration, ValidationResult};
use pagebuilder_core::error::CoreError;
use pagebuilder_core::page::{validate_block_key, validate_id, validate_locale, ADMIN_PAGES_PATH};
use pagebuilder_core::snapshot::{decode_json_lossy, encode_json, ContentBlockWithTranslations};
use pagebuilder_core::types::{DbId, JsonMap};
use pagebuilder_db::models::block_translation::NewTranslation;
use pagebuilder_db::models::content_block::{
    BlockOrder, ContentBlock, ContentBlockChanges, CreateContentBlock, NewContentBlock,
    TranslationMap, UpdateContentBlock,
};
use pagebuilder_db::repositories::{ContentBlockRepo, PageLayoutRepo};
use serde::Deserialize;

use super::require_layout;
use crate::error::{AppError, AppResult, MSG_BLOCK_KEY_EXISTS};
use crate::response::ActionResponse;
use crate::state::AppState;

/// Request body for validating a block without saving it.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateBlockInput {
    pub block_type: String,
    #[serde(default)]
    pub configuration: JsonMap,
    #[serde(default)]
    pub content: JsonMap,
}

/// Validate every locale's content and encode it for storage.
///
/// Validator warnings are appended to `warnings` prefixed with the locale.
fn check_translations(
    registry: &BlockRegistry,
    block_type: &str,
    configuration: &JsonMap,
    translations: &TranslationMap,
    warnings: &mut Vec<String>,
) -> AppResult<Vec<NewTranslation>> {
    let mut encoded = Vec::with_capacity(translations.len());
    for (locale, content) in translations {
        validate_locale(locale)?;
        let result = validate_block(registry, block_type, configuration, content);
        if !result.is_valid {
            return Err(CoreError::Validation(format!(
                "Invalid {locale} content: {}",
                result.error_summary()
            ))
            .into());
        }
        warnings.extend(
            result
                .warnings
                .iter()
                .map(|w| format!("{locale}: {}", w.message)),
        );
        encoded.push(NewTranslation {
            locale: locale.clone(),
            content: encode_json(content),
        });
    }
    Ok(encoded)
}

/// Validate a configuration on its own, for writes that carry no content.
fn check_configuration(
    registry: &BlockRegistry,
    block_type: &str,
    configuration: &JsonMap,
    warnings: &mut Vec<String>,
) -> AppResult<()> {
    let result = validate_configuration(registry, block_type, configuration);
    if !result.is_valid {
        return Err(CoreError::Validation(format!(
            "Invalid configuration: {}",
            result.error_summary()
        ))
        .into());
    }
    warnings.extend(result.warnings.into_iter().map(|w| w.message));
    Ok(())
}

async fn require_block(state: &AppState, id: DbId) -> AppResult<ContentBlock> {
    ContentBlockRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Block", id }.into())
}

async fn load_block(state: &AppState, id: DbId) -> AppResult<ContentBlockWithTranslations> {
    ContentBlockRepo::find_with_translations(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "Block", id }.into())
}

/// Revalidate the admin listing and the public route of the block's page.
async fn revalidate_layout(state: &AppState, layout_id: DbId) {
    match PageLayoutRepo::find_by_id(&state.pool, layout_id).await {
        Ok(Some(layout)) => state.revalidate_pages(layout_id, &[&layout.route]),
        Ok(None) => state.revalidation.revalidate(layout_id, ADMIN_PAGES_PATH),
        Err(e) => {
            tracing::warn!(layout_id, error = %e, "Route lookup for revalidation failed");
            state.revalidation.revalidate(layout_id, ADMIN_PAGES_PATH);
        }
    }
}

/// Blocks of a page in render order, each with its translations.
pub async fn get_content_blocks(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
) -> ActionResponse<Vec<ContentBlockWithTranslations>> {
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        require_layout(state, layout_id).await?;
        Ok::<_, AppError>(ContentBlockRepo::list_with_translations(&state.pool, layout_id).await?)
    }
    .await;
    ActionResponse::from_result(result)
}

pub async fn get_content_block(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<ContentBlockWithTranslations> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "block")?;
        load_block(state, id).await
    }
    .await;
    ActionResponse::from_result(result)
}

/// Add a block to a page.
///
/// Checks, in order: block type known, allowed on the page type, key free on
/// the page, instance limit, then content of every supplied locale. Without
/// an explicit order the block goes after the last one.
pub async fn create_content_block(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
    input: CreateContentBlock,
) -> ActionResponse<ContentBlockWithTranslations> {
    let mut warnings = Vec::new();
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        validate_block_key(&input.block_key)?;
        let layout = require_layout(state, layout_id).await?;

        let block_type = state
            .registry
            .get_block_type(&input.block_type)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown block type: {}", input.block_type))
            })?;
        if !state
            .registry
            .is_block_allowed_on_page(&block_type.id, &layout.page_type)
        {
            return Err(CoreError::Validation(format!(
                "Block type {} is not allowed on {} pages",
                block_type.id, layout.page_type
            ))
            .into());
        }

        if ContentBlockRepo::key_exists(&state.pool, layout_id, &input.block_key, None).await? {
            return Err(CoreError::Conflict(MSG_BLOCK_KEY_EXISTS.into()).into());
        }

        let existing = ContentBlockRepo::count_by_type(&state.pool, layout_id, &block_type.id).await?;
        let allowance = state
            .registry
            .can_add_more_blocks(&block_type.id, u32::try_from(existing).unwrap_or(u32::MAX));
        if !allowance.can_add {
            let reason = allowance
                .reason
                .unwrap_or_else(|| "Block limit reached".to_string());
            return Err(CoreError::Validation(reason).into());
        }

        let translations = if input.translations.is_empty() {
            check_configuration(
                &state.registry,
                &block_type.id,
                &input.configuration,
                &mut warnings,
            )?;
            Vec::new()
        } else {
            check_translations(
                &state.registry,
                &block_type.id,
                &input.configuration,
                &input.translations,
                &mut warnings,
            )?
        };

        let display_order = match input.display_order {
            Some(order) => order,
            None => ContentBlockRepo::max_display_order(&state.pool, layout_id)
                .await?
                .map_or(0, |max| max + 1),
        };

        let block = ContentBlockRepo::create(
            &state.pool,
            &NewContentBlock {
                layout_id,
                block_type: block_type.id.clone(),
                block_key: input.block_key.clone(),
                display_order,
                is_visible: input.is_visible.unwrap_or(true),
                configuration: encode_json(&input.configuration),
            },
            &translations,
        )
        .await?;
        tracing::info!(
            layout_id,
            block_id = block.id,
            block_type = %block.block_type,
            locales = translations.len(),
            "Content block created",
        );
        state.revalidate_pages(layout_id, &[&layout.route]);
        load_block(state, block.id).await
    }
    .await;
    ActionResponse::from_result(result).with_warnings(warnings)
}

/// Update a block.
///
/// The block type cannot change. A supplied `translations` map replaces all
/// existing translations; locales left out are removed. A configuration sent
/// without translations is checked on its own.
pub async fn update_content_block(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
    input: UpdateContentBlock,
) -> ActionResponse<ContentBlockWithTranslations> {
    let mut warnings = Vec::new();
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "block")?;
        if let Some(key) = &input.block_key {
            validate_block_key(key)?;
        }
        let existing = require_block(state, id).await?;

        if let Some(key) = input.block_key.as_deref().filter(|k| *k != existing.block_key) {
            if ContentBlockRepo::key_exists(&state.pool, existing.layout_id, key, Some(id)).await? {
                return Err(CoreError::Conflict(MSG_BLOCK_KEY_EXISTS.into()).into());
            }
        }

        let translations = match &input.translations {
            Some(map) => {
                let configuration = input
                    .configuration
                    .clone()
                    .unwrap_or_else(|| decode_json_lossy(&existing.configuration));
                Some(check_translations(
                    &state.registry,
                    &existing.block_type,
                    &configuration,
                    map,
                    &mut warnings,
                )?)
            }
            None => {
                if let Some(configuration) = &input.configuration {
                    check_configuration(
                        &state.registry,
                        &existing.block_type,
                        configuration,
                        &mut warnings,
                    )?;
                }
                None
            }
        };

        let changes = ContentBlockChanges {
            block_key: input.block_key.clone(),
            display_order: input.display_order,
            is_visible: input.is_visible,
            configuration: input.configuration.as_ref().map(encode_json),
        };
        ContentBlockRepo::update(&state.pool, id, &changes, translations.as_deref())
            .await?
            .ok_or(CoreError::NotFound { entity: "Block", id })?;

        tracing::info!(
            layout_id = existing.layout_id,
            block_id = id,
            translations_replaced = translations.is_some(),
            "Content block updated",
        );
        revalidate_layout(state, existing.layout_id).await;
        load_block(state, id).await
    }
    .await;
    ActionResponse::from_result(result).with_warnings(warnings)
}

/// Delete a block; its translations go with it.
pub async fn delete_content_block(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<()> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "block")?;
        let block = require_block(state, id).await?;
        if !ContentBlockRepo::delete(&state.pool, id).await? {
            return Err(CoreError::NotFound { entity: "Block", id }.into());
        }
        tracing::info!(layout_id = block.layout_id, block_id = id, "Content block deleted");
        revalidate_layout(state, block.layout_id).await;
        Ok::<_, AppError>(())
    }
    .await;
    ActionResponse::from_result(result)
}

pub async fn toggle_block_visibility(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<ContentBlock> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "block")?;
        let block = ContentBlockRepo::toggle_visibility(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Block", id })?;
        tracing::info!(
            layout_id = block.layout_id,
            block_id = id,
            is_visible = block.is_visible,
            "Content block visibility toggled",
        );
        revalidate_layout(state, block.layout_id).await;
        Ok::<_, AppError>(block)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Set the display order of blocks on a page.
///
/// Every referenced block must belong to the page; otherwise nothing is
/// changed.
pub async fn reorder_content_blocks(
    state: &AppState,
    access: &AccessContext,
    layout_id: DbId,
    orders: Vec<BlockOrder>,
) -> ActionResponse<Vec<ContentBlockWithTranslations>> {
    let result = async {
        require_page_admin(access)?;
        validate_id(layout_id, "page")?;
        let layout = require_layout(state, layout_id).await?;

        let owned = ContentBlockRepo::ids_for_layout(&state.pool, layout_id).await?;
        if let Some(stray) = orders.iter().find(|o| !owned.contains(&o.id)) {
            return Err(CoreError::Validation(format!(
                "Block {} does not belong to page {layout_id}",
                stray.id
            ))
            .into());
        }

        ContentBlockRepo::reorder(&state.pool, layout_id, &orders).await?;
        tracing::info!(layout_id, blocks = orders.len(), "Content blocks reordered");
        state.revalidate_pages(layout_id, &[&layout.route]);
        Ok::<_, AppError>(ContentBlockRepo::list_with_translations(&state.pool, layout_id).await?)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Run the block validator without saving anything.
///
/// The outcome is the data of a successful response even when the block is
/// invalid.
pub async fn validate_block_input(
    state: &AppState,
    access: &AccessContext,
    input: ValidateBlockInput,
) -> ActionResponse<ValidationResult> {
    let result = require_page_admin(access).map_err(AppError::from).map(|()| {
        validate_block(
            &state.registry,
            &input.block_type,
            &input.configuration,
            &input.content,
        )
    });
    ActionResponse::from_result(result)
}
