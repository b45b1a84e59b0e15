//! Read-only registry and template lookups for the editor.

use pagebuilder_core::access::{require_page_admin, AccessContext};
use pagebuilder_core::block_registry::{ContentBlockType, PageType};
use pagebuilder_core::block_templates::{AppliedTemplate, BlockTemplate, TemplateOverrides};
use pagebuilder_core::page::validate_page_type;
use serde::Deserialize;

use crate::error::AppError;
use crate::response::ActionResponse;
use crate::state::AppState;

/// Optional filters for [`get_templates`]; both apply when both are given.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateFilter {
    pub block_type: Option<String>,
    pub category: Option<String>,
}

fn template_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Template not found: {id}"))
}

pub async fn get_page_types(state: &AppState, access: &AccessContext) -> ActionResponse<Vec<PageType>> {
    let result = require_page_admin(access)
        .map(|()| state.registry.page_types().to_vec())
        .map_err(AppError::from);
    ActionResponse::from_result(result)
}

/// Every block type, or only those a page type accepts.
pub async fn get_block_types(
    state: &AppState,
    access: &AccessContext,
    page_type: Option<&str>,
) -> ActionResponse<Vec<ContentBlockType>> {
    let result = (|| {
        require_page_admin(access)?;
        let types = match page_type {
            Some(page_type) => {
                validate_page_type(&state.registry, page_type)?;
                state
                    .registry
                    .get_allowed_block_types(page_type)
                    .into_iter()
                    .cloned()
                    .collect()
            }
            None => state.registry.block_types().to_vec(),
        };
        Ok::<_, AppError>(types)
    })();
    ActionResponse::from_result(result)
}

pub async fn get_templates(
    state: &AppState,
    access: &AccessContext,
    filter: TemplateFilter,
) -> ActionResponse<Vec<BlockTemplate>> {
    let result = require_page_admin(access).map_err(AppError::from).map(|()| {
        let catalog = &state.templates;
        let matching = match (filter.block_type.as_deref(), filter.category.as_deref()) {
            (Some(block_type), category) => catalog
                .get_templates_for_block_type(block_type)
                .into_iter()
                .filter(|t| category.is_none_or(|c| t.category == c))
                .collect(),
            (None, Some(category)) => catalog.get_templates_by_category(category),
            (None, None) => catalog.templates().iter().collect::<Vec<_>>(),
        };
        matching.into_iter().cloned().collect()
    });
    ActionResponse::from_result(result)
}

/// A template's configuration, content and styling, ready to prefill a new
/// block.
pub async fn apply_template(
    state: &AppState,
    access: &AccessContext,
    id: &str,
) -> ActionResponse<AppliedTemplate> {
    let result = require_page_admin(access)
        .map_err(AppError::from)
        .and_then(|()| state.templates.apply_template(id).ok_or_else(|| template_not_found(id)));
    ActionResponse::from_result(result)
}

/// Apply a template with caller overrides merged key by key.
pub async fn customize_template(
    state: &AppState,
    access: &AccessContext,
    id: &str,
    overrides: TemplateOverrides,
) -> ActionResponse<AppliedTemplate> {
    let result = require_page_admin(access)
        .map_err(AppError::from)
        .and_then(|()| {
            state
                .templates
                .customize_template(id, &overrides)
                .ok_or_else(|| template_not_found(id))
        });
    ActionResponse::from_result(result)
}
