pub mod blocks;
pub mod health;
pub mod page_builder;
pub mod pages;
pub mod versions;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /public/pages?route=                             published page (public)
///
/// /admin/pages                                     list, create
/// /admin/pages/{id}                                get, update, delete
/// /admin/pages/{id}/publish                        publish (POST)
/// /admin/pages/{id}/duplicate                      duplicate (POST)
/// /admin/pages/{id}/blocks                         list, create
/// /admin/pages/{id}/blocks/reorder                 reorder (PUT)
/// /admin/pages/{id}/versions                       list, create
/// /admin/pages/{id}/versions/cleanup               retention cleanup (POST)
///
/// /admin/blocks/{id}                               get, update, delete
/// /admin/blocks/{id}/toggle-visibility             toggle (POST)
///
/// /admin/versions/compare                          compare two versions (GET)
/// /admin/versions/{id}                             get, delete
/// /admin/versions/{id}/restore                     restore (POST)
///
/// /admin/page-builder/...                          registry, validator, templates
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/public/pages",
            get(handlers::public::get_published_page),
        )
        .nest("/admin/pages", pages::router())
        .nest("/admin/blocks", blocks::router())
        .nest("/admin/versions", versions::router())
        .nest("/admin/page-builder", page_builder::router())
}
