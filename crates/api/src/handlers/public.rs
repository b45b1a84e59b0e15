//! Unauthenticated read access for the public site.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::actions::pages;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub route: String,
}

/// GET /public/pages?route=/about
pub async fn get_published_page(
    State(state): State<AppState>,
    Query(params): Query<RouteParams>,
) -> impl IntoResponse {
    pages::get_published_page_by_route(&state, &params.route).await
}
