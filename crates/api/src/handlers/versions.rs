//! Handlers for individual page versions.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use pagebuilder_core::types::DbId;
use pagebuilder_db::models::page_version::CompareVersions;

use crate::access::CurrentAccess;
use crate::actions::versions;
use crate::state::AppState;

/// GET /admin/versions/{id}
pub async fn get_version(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    versions::get_page_version(&state, &access, id).await
}

/// DELETE /admin/versions/{id}
pub async fn delete_version(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    versions::delete_page_version(&state, &access, id).await
}

/// POST /admin/versions/{id}/restore
pub async fn restore_version(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Path(id): Path<DbId>,
) -> impl IntoResponse {
    versions::restore_page_version(&state, &access, id).await
}

/// GET /admin/versions/compare?v1=&v2=
pub async fn compare_versions(
    State(state): State<AppState>,
    CurrentAccess(access): CurrentAccess,
    Query(params): Query<CompareVersions>,
) -> impl IntoResponse {
    versions::compare_page_versions(&state, &access, params.v1, params.v2).await
}
