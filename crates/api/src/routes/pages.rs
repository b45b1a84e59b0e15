//! Route definitions for page layouts, mounted at `/admin/pages`.
//!
//! ```text
//! GET    /                         list_pages
//! POST   /                         create_page
//! GET    /{id}                     get_page
//! PUT    /{id}                     update_page
//! DELETE /{id}                     delete_page
//! POST   /{id}/publish             publish_page
//! POST   /{id}/duplicate           duplicate_page
//! GET    /{id}/blocks              list_blocks
//! POST   /{id}/blocks              create_block
//! PUT    /{id}/blocks/reorder      reorder_blocks
//! GET    /{id}/versions            list_versions
//! POST   /{id}/versions            create_version
//! POST   /{id}/versions/cleanup    cleanup_versions
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::pages;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route(
            "/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route("/{id}/publish", post(pages::publish_page))
        .route("/{id}/duplicate", post(pages::duplicate_page))
        .route(
            "/{id}/blocks",
            get(pages::list_blocks).post(pages::create_block),
        )
        .route("/{id}/blocks/reorder", put(pages::reorder_blocks))
        .route(
            "/{id}/versions",
            get(pages::list_versions).post(pages::create_version),
        )
        .route("/{id}/versions/cleanup", post(pages::cleanup_versions))
}
