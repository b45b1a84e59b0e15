//! Handlers for the block registry, validator and template catalogue.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use pagebuilder_core::block_templates::TemplateOverrides;
use serde::Deserialize;

use crate::access::CurrentAccess;
use crate::actions::blocks::{self, ValidateBlockInput};
use crate::actions::catalog::{self, TemplateFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BlockTypeParams {
    pub page_type: Option<String>,
}

/// GET /admin/page-builder/page-types
pub async fn list_page_types(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
) -> impl IntoResponse {
    catalog::get_page_types(&state, &access).await
}

/// GET /admin/page-builder/block-types?page_type=
pub async fn list_block_types(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Query(params): Query<BlockTypeParams>,
) -> impl IntoResponse {
    catalog::get_block_types(&state, &access, params.page_type.as_deref()).await
}

/// POST /admin/page-builder/validate
pub async fn validate_block(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Json(input): Json<ValidateBlockInput>,
) -> impl IntoResponse {
    blocks::validate_block_input(&state, &access, input).await
}

/// GET /admin/page-builder/templates?block_type=&category=
pub async fn list_templates(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Query(filter): Query<TemplateFilter>,
) -> impl IntoResponse {
    catalog::get_templates(&state, &access, filter).await
}

/// GET /admin/page-builder/templates/{id}
pub async fn apply_template(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<String>,
) -> impl IntoResponse {
    catalog::apply_template(&state, &access, &id).await
}

/// POST /admin/page-builder/templates/{id}/customize
pub async fn customize_template(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<String>,
    Json(overrides): Json<TemplateOverrides>,
) -> impl IntoResponse {
    catalog::customize_template(&state, &access, &id, overrides).await
}
