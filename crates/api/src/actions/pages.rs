//! Page layout actions: listing, creation, editing, publishing, duplication
//! and deletion.

use pagebuilder_core::access::{require_page_admin, AccessContext};
use pagebuilder_core::error::CoreError;
use pagebuilder_core::page::{validate_id, validate_page_name, validate_page_type, validate_route};
use pagebuilder_core::types::DbId;
use pagebuilder_db::models::page_layout::{
    CreatePageLayout, DuplicatePage, PageLayout, PageWithBlocks, UpdatePageLayout,
};
use pagebuilder_db::repositories::{ContentBlockRepo, PageLayoutRepo};

use super::{require_layout, versions};
use crate::error::{AppError, MSG_ROUTE_EXISTS};
use crate::response::ActionResponse;
use crate::state::AppState;

/// Warning added when the pre-publish snapshot cannot be written.
pub const WARN_PUBLISH_SNAPSHOT: &str =
    "Page was published but its version snapshot could not be created";

/// All pages, most recently edited first.
pub async fn get_pages(state: &AppState, access: &AccessContext) -> ActionResponse<Vec<PageLayout>> {
    let result = async {
        require_page_admin(access)?;
        Ok::<_, AppError>(PageLayoutRepo::list(&state.pool).await?)
    }
    .await;
    ActionResponse::from_result(result)
}

/// One page with all of its blocks, hidden ones included.
pub async fn get_page(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<PageWithBlocks> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "page")?;
        let layout = require_layout(state, id).await?;
        let blocks = ContentBlockRepo::list_with_translations(&state.pool, id).await?;
        Ok::<_, AppError>(PageWithBlocks { layout, blocks })
    }
    .await;
    ActionResponse::from_result(result)
}

/// The active, published page at `route` with its visible blocks.
///
/// Public: no access check.
pub async fn get_published_page_by_route(
    state: &AppState,
    route: &str,
) -> ActionResponse<PageWithBlocks> {
    let result = async {
        validate_route(route)?;
        let layout = PageLayoutRepo::find_published_by_route(&state.pool, route)
            .await?
            .ok_or_else(|| AppError::NotFound("Page not found".into()))?;
        let blocks = ContentBlockRepo::list_with_translations(&state.pool, layout.id)
            .await?
            .into_iter()
            .filter(|b| b.is_visible)
            .collect();
        Ok::<_, AppError>(PageWithBlocks { layout, blocks })
    }
    .await;
    ActionResponse::from_result(result)
}

/// Create an unpublished page.
pub async fn create_page(
    state: &AppState,
    access: &AccessContext,
    input: CreatePageLayout,
) -> ActionResponse<PageLayout> {
    let result = async {
        require_page_admin(access)?;
        validate_page_name(&input.name)?;
        validate_page_type(&state.registry, &input.page_type)?;
        validate_route(&input.route)?;

        if PageLayoutRepo::route_exists(&state.pool, &input.route, None).await? {
            return Err(CoreError::Conflict(MSG_ROUTE_EXISTS.into()).into());
        }

        let page = PageLayoutRepo::create(&state.pool, &input, access.staff_id).await?;
        tracing::info!(
            layout_id = page.id,
            route = %page.route,
            staff_id = ?access.staff_id,
            "Page created",
        );
        state.revalidate_pages(page.id, &[&page.route]);
        Ok::<_, AppError>(page)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Partially update a page's layout fields.
///
/// Supplied required fields may not be blank; a changed route must still be
/// unique, and a changed page type must accept every block already on the
/// page.
pub async fn update_page_layout(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
    input: UpdatePageLayout,
) -> ActionResponse<PageLayout> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "page")?;
        if let Some(name) = &input.name {
            validate_page_name(name)?;
        }
        if let Some(page_type) = &input.page_type {
            validate_page_type(&state.registry, page_type)?;
        }
        if let Some(route) = &input.route {
            validate_route(route)?;
        }

        let existing = require_layout(state, id).await?;
        if let Some(route) = input.route.as_deref().filter(|r| *r != existing.route) {
            if PageLayoutRepo::route_exists(&state.pool, route, Some(id)).await? {
                return Err(CoreError::Conflict(MSG_ROUTE_EXISTS.into()).into());
            }
        }
        if let Some(page_type) = input.page_type.as_deref().filter(|t| *t != existing.page_type) {
            let blocks = ContentBlockRepo::list_by_layout(&state.pool, id).await?;
            if let Some(block) = blocks
                .iter()
                .find(|b| !state.registry.is_block_allowed_on_page(&b.block_type, page_type))
            {
                return Err(CoreError::Validation(format!(
                    "Block type {} is not allowed on {} pages",
                    block.block_type, page_type
                ))
                .into());
            }
        }

        let page = PageLayoutRepo::update(&state.pool, id, &input)
            .await?
            .ok_or(CoreError::NotFound { entity: "Page", id })?;
        tracing::info!(layout_id = id, staff_id = ?access.staff_id, "Page updated");
        if existing.route == page.route {
            state.revalidate_pages(page.id, &[&page.route]);
        } else {
            state.revalidate_pages(page.id, &[&existing.route, &page.route]);
        }
        Ok::<_, AppError>(page)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Publish a page, recording its current state as a published version
/// first. Publishing is one-way.
pub async fn publish_page(
    state: &AppState,
    access: &AccessContext,
    id: DbId,
) -> ActionResponse<PageLayout> {
    let mut warnings = Vec::new();
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "page")?;
        require_layout(state, id).await?;

        if let Err(e) = versions::record_version(state, id, true, access.staff_id).await {
            tracing::warn!(layout_id = id, error = %e, "Pre-publish snapshot failed");
            warnings.push(WARN_PUBLISH_SNAPSHOT.to_string());
        }

        let page = PageLayoutRepo::publish(&state.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Page", id })?;
        tracing::info!(layout_id = id, staff_id = ?access.staff_id, "Page published");
        state.revalidate_pages(page.id, &[&page.route]);
        Ok::<_, AppError>(page)
    }
    .await;
    ActionResponse::from_result(result).with_warnings(warnings)
}

/// Copy a page with all blocks and translations under a new route.
///
/// The copy is unpublished and starts without versions. Its name defaults
/// to `"<source name> (Copy)"`.
pub async fn duplicate_page(
    state: &AppState,
    access: &AccessContext,
    source_id: DbId,
    input: DuplicatePage,
) -> ActionResponse<PageLayout> {
    let result = async {
        require_page_admin(access)?;
        validate_id(source_id, "page")?;
        validate_route(&input.new_route)?;

        let source = require_layout(state, source_id).await?;
        let name = input
            .new_name
            .unwrap_or_else(|| format!("{} (Copy)", source.name));
        validate_page_name(&name)?;

        if PageLayoutRepo::route_exists(&state.pool, &input.new_route, None).await? {
            return Err(CoreError::Conflict(MSG_ROUTE_EXISTS.into()).into());
        }

        let copy = PageLayoutRepo::duplicate(
            &state.pool,
            &source,
            &input.new_route,
            &name,
            access.staff_id,
        )
        .await?;
        tracing::info!(
            source_id,
            layout_id = copy.id,
            route = %copy.route,
            "Page duplicated",
        );
        state.revalidate_pages(copy.id, &[&copy.route]);
        Ok::<_, AppError>(copy)
    }
    .await;
    ActionResponse::from_result(result)
}

/// Delete a page with its blocks, translations and versions.
pub async fn delete_page(state: &AppState, access: &AccessContext, id: DbId) -> ActionResponse<()> {
    let result = async {
        require_page_admin(access)?;
        validate_id(id, "page")?;
        let page = require_layout(state, id).await?;

        if !PageLayoutRepo::delete(&state.pool, id).await? {
            return Err(CoreError::NotFound { entity: "Page", id }.into());
        }
        tracing::info!(layout_id = id, staff_id = ?access.staff_id, "Page deleted");
        state.revalidate_pages(page.id, &[&page.route]);
        Ok::<_, AppError>(())
    }
    .await;
    ActionResponse::from_result(result)
}

