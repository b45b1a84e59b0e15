//! Handlers for page layouts and the page-scoped block and version
//! collections.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pagebuilder_core::types::DbId;
use pagebuilder_db::models::content_block::{BlockOrder, CreateContentBlock};
use pagebuilder_db::models::page_layout::{CreatePageLayout, DuplicatePage, UpdatePageLayout};
use pagebuilder_db::models::page_version::{CleanupVersions, CreatePageVersion};

use crate::access::CurrentAccess;
use crate::actions::{blocks, pages, versions};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// GET /admin/pages
pub async fn list_pages(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
) -> impl IntoResponse {
    pages::get_pages(&state, &access).await
}

/// POST /admin/pages
pub async fn create_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Json(input): Json<CreatePageLayout>,
) -> impl IntoResponse {
    pages::create_page(&state, &access, input)
        .await
        .with_status(StatusCode::CREATED)
}

/// GET /admin/pages/{id}
pub async fn get_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    pages::get_page(&state, &access, id).await
}

/// PUT /admin/pages/{id}
pub async fn update_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePageLayout>,
) -> impl IntoResponse {
    pages::update_page_layout(&state, &access, id, input).await
}

/// DELETE /admin/pages/{id}
pub async fn delete_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    pages::delete_page(&state, &access, id).await
}

/// POST /admin/pages/{id}/publish
pub async fn publish_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    pages::publish_page(&state, &access, id).await
}

/// POST /admin/pages/{id}/duplicate
pub async fn duplicate_page(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    Json(input): Json<DuplicatePage>,
) -> impl IntoResponse {
    pages::duplicate_page(&state, &access, id, input)
        .await
        .with_status(StatusCode::CREATED)
}

// ---------------------------------------------------------------------------
// Blocks of a page
// ---------------------------------------------------------------------------

/// GET /admin/pages/{id}/blocks
pub async fn list_blocks(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    blocks::get_content_blocks(&state, &access, id).await
}

/// POST /admin/pages/{id}/blocks
pub async fn create_block(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    Json(input): Json<CreateContentBlock>,
) -> impl IntoResponse {
    blocks::create_content_block(&state, &access, id, input)
        .await
        .with_status(StatusCode::CREATED)
}

/// PUT /admin/pages/{id}/blocks/reorder
pub async fn reorder_blocks(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    Json(orders): Json<Vec<BlockOrder>>,
) -> impl IntoResponse {
    blocks::reorder_content_blocks(&state, &access, id, orders).await
}

// ---------------------------------------------------------------------------
// Versions of a page
// ---------------------------------------------------------------------------

/// GET /admin/pages/{id}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    versions::get_page_versions(&state, &access, id).await
}

/// POST /admin/pages/{id}/versions
///
/// The body is optional; an empty body records an unpublished version.
pub async fn create_version(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    input: Option<Json<CreatePageVersion>>,
) -> impl IntoResponse {
    let input = input.map(|Json(v)| v).unwrap_or_default();
    versions::create_page_version(&state, &access, id, input)
        .await
        .with_status(StatusCode::CREATED)
}

/// POST /admin/pages/{id}/versions/cleanup
pub async fn cleanup_versions(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    input: Option<Json<CleanupVersions>>,
) -> impl IntoResponse {
    let input = input.map(|Json(v)| v).unwrap_or_default();
    versions::cleanup_old_page_versions(&state, &access, id, input).await
}
