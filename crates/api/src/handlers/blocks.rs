//! Handlers for individual content blocks.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use pagebuilder_core::types::DbId;
use pagebuilder_db::models::content_block::UpdateContentBlock;

use crate::access::CurrentAccess;
use crate::actions::blocks;
use crate::state::AppState;

/// GET /admin/blocks/{id}
pub async fn get_block(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    blocks::get_content_block(&state, &access, id).await
}

/// PUT /admin/blocks/{id}
pub async fn update_block(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContentBlock>,
) -> impl IntoResponse {
    blocks::update_content_block(&state, &access, id, input).await
}

/// DELETE /admin/blocks/{id}
pub async fn delete_block(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    blocks::delete_content_block(&state, &access, id).await
}

/// POST /admin/blocks/{id}/toggle-visibility
pub async fn toggle_visibility(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    blocks::toggle_block_visibility(&state, &access, id).await
}
